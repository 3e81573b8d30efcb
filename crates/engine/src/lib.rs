use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

pub use api_types::Money;
pub use error::EngineError;
pub use sea_orm::DbErr;
pub use seed::sample_transactions;
pub use store::{DatabaseStore, MemoryStore, TransactionStore};
pub use transactions::{
    NewTransaction, Transaction, TransactionId, TransactionKind, TransactionPatch,
};

mod error;
mod seed;
mod store;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;

/// Update request for a stored transaction.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub transaction_id: TransactionId,
    pub patch: TransactionPatch,
    /// Kind the caller believes the transaction has.
    ///
    /// When present it must match the stored kind, otherwise the update is
    /// rejected with [`EngineError::ImmutableField`].
    pub kind: Option<TransactionKind>,
}

/// Entry point for every transaction operation.
///
/// Reads go straight to the store; writes are serialized through a single
/// writer lock so that a read-check-write sequence is atomic per collection.
#[derive(Debug)]
pub struct Engine {
    store: Arc<dyn TransactionStore>,
    writer: Mutex<()>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Lists transactions in insertion order, optionally filtered by kind.
    pub async fn list_transactions(
        &self,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Vec<Transaction>> {
        self.store.list(kind).await
    }

    pub async fn transaction(&self, id: &TransactionId) -> ResultEngine<Transaction> {
        self.store.get(id).await
    }

    pub async fn create_transaction(&self, new: NewTransaction) -> ResultEngine<Transaction> {
        let _writer = self.writer.lock().await;
        let tx = self.store.create(new).await?;
        tracing::debug!(id = %tx.id, kind = tx.kind.as_str(), "transaction created");
        Ok(tx)
    }

    /// Merges the patch over the stored transaction.
    ///
    /// Fails with [`EngineError::KeyNotFound`] when the id is unknown and with
    /// [`EngineError::ImmutableField`] when `cmd.kind` differs from the
    /// stored kind.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        let _writer = self.writer.lock().await;
        if let Some(kind) = cmd.kind {
            let current = self.store.get(&cmd.transaction_id).await?;
            if current.kind != kind {
                return Err(EngineError::ImmutableField("transaction type".to_string()));
            }
        }

        let tx = self.store.update(&cmd.transaction_id, cmd.patch).await?;
        tracing::debug!(id = %tx.id, "transaction updated");
        Ok(tx)
    }

    pub async fn delete_transaction(&self, id: &TransactionId) -> ResultEngine<()> {
        let _writer = self.writer.lock().await;
        self.store.delete(id).await?;
        tracing::debug!(%id, "transaction deleted");
        Ok(())
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: Option<DatabaseConnection>,
    seed: Vec<NewTransaction>,
}

impl EngineBuilder {
    /// Persist transactions in the given database instead of in memory.
    ///
    /// The schema must already be migrated.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = Some(db);
        self
    }

    /// Transactions inserted on build when the store is empty.
    pub fn seed(mut self, transactions: Vec<NewTransaction>) -> EngineBuilder {
        self.seed = transactions;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let store: Arc<dyn TransactionStore> = match self.database {
            Some(database) => Arc::new(DatabaseStore::new(database)),
            None => Arc::new(MemoryStore::new()),
        };

        if !self.seed.is_empty() && store.list(None).await?.is_empty() {
            tracing::info!("seeding {} sample transactions", self.seed.len());
            for new in self.seed {
                store.create(new).await?;
            }
        }

        Ok(Engine {
            store,
            writer: Mutex::new(()),
        })
    }
}
