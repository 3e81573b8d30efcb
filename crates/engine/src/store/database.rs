use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

use crate::{
    EngineError, NewTransaction, ResultEngine, Transaction, TransactionId, TransactionKind,
    TransactionPatch, transactions,
};

use super::TransactionStore;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

/// SQLite-backed store (via sea-orm).
///
/// The schema is owned by the `migration` crate; run it before building the
/// store.
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    database: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

async fn find_model<C: ConnectionTrait>(
    db: &C,
    id: &TransactionId,
) -> ResultEngine<transactions::Model> {
    transactions::Entity::find()
        .filter(transactions::Column::Id.eq(id.as_str()))
        .one(db)
        .await?
        .ok_or_else(EngineError::transaction_not_found)
}

#[async_trait]
impl TransactionStore for DatabaseStore {
    async fn list(&self, kind: Option<TransactionKind>) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find().order_by_asc(transactions::Column::Seq);
        if let Some(kind) = kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    async fn get(&self, id: &TransactionId) -> ResultEngine<Transaction> {
        let model = find_model(&self.database, id).await?;
        Transaction::try_from(model)
    }

    async fn create(&self, new: NewTransaction) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let tx = new.into_transaction(TransactionId::generate());
            let model = transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Transaction::try_from(model)
        })
    }

    async fn update(
        &self,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = find_model(&db_tx, id).await?;
            let mut tx = Transaction::try_from(model.clone())?;
            patch.apply(&mut tx);

            let mut active: transactions::ActiveModel = model.into();
            active.amount_minor = ActiveValue::Set(tx.amount.cents());
            active.category = ActiveValue::Set(tx.category);
            active.description = ActiveValue::Set(tx.description);
            active.date = ActiveValue::Set(tx.date);

            let model = active.update(&db_tx).await?;
            Transaction::try_from(model)
        })
    }

    async fn delete(&self, id: &TransactionId) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = transactions::Entity::delete_many()
                .filter(transactions::Column::Id.eq(id.as_str()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::transaction_not_found());
            }
            Ok(())
        })
    }
}
