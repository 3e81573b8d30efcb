//! Transactions API endpoints

use api_types::transaction::{
    NewTransaction, Transaction, TransactionListQuery, TransactionType, TransactionUpdate,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> TransactionType {
    match kind {
        engine::TransactionKind::Income => TransactionType::Income,
        engine::TransactionKind::Outcome => TransactionType::Outcome,
    }
}

fn engine_kind(kind: TransactionType) -> engine::TransactionKind {
    match kind {
        TransactionType::Income => engine::TransactionKind::Income,
        TransactionType::Outcome => engine::TransactionKind::Outcome,
    }
}

fn map_transaction(tx: engine::Transaction) -> Transaction {
    Transaction {
        id: tx.id.to_string(),
        amount: tx.amount,
        category: tx.category,
        description: tx.description,
        date: tx.date,
        kind: map_kind(tx.kind),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<Transaction>>, ServerError> {
    let txs = state
        .engine
        .list_transactions(query.kind.map(engine_kind))
        .await?;

    Ok(Json(txs.into_iter().map(map_transaction).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, ServerError> {
    let tx = state
        .engine
        .transaction(&engine::TransactionId::from(id))
        .await?;

    Ok(Json(map_transaction(tx)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), ServerError> {
    let tx = state
        .engine
        .create_transaction(engine::NewTransaction {
            amount: payload.amount,
            category: payload.category,
            description: payload.description,
            date: payload.date,
            kind: engine_kind(payload.kind),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<Transaction>, ServerError> {
    if payload.id.as_ref().is_some_and(|body_id| body_id != &id) {
        return Err(ServerError::Generic(
            "transaction id cannot be changed".to_string(),
        ));
    }

    let tx = state
        .engine
        .update_transaction(engine::UpdateTransactionCmd {
            transaction_id: engine::TransactionId::from(id),
            patch: engine::TransactionPatch {
                amount: payload.amount,
                category: payload.category,
                description: payload.description,
                date: payload.date,
            },
            kind: payload.kind.map(engine_kind),
        })
        .await?;

    Ok(Json(map_transaction(tx)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(&engine::TransactionId::from(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
