use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    EngineError, NewTransaction, ResultEngine, Transaction, TransactionId, TransactionKind,
    TransactionPatch,
};

use super::TransactionStore;

/// In-process store backed by an owned `Vec`.
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: RwLock<Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn list(&self, kind: Option<TransactionKind>) -> ResultEngine<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .iter()
            .filter(|tx| kind.is_none_or(|kind| tx.kind == kind))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &TransactionId) -> ResultEngine<Transaction> {
        let transactions = self.transactions.read().await;
        transactions
            .iter()
            .find(|tx| &tx.id == id)
            .cloned()
            .ok_or_else(EngineError::transaction_not_found)
    }

    async fn create(&self, new: NewTransaction) -> ResultEngine<Transaction> {
        let mut transactions = self.transactions.write().await;
        let id = loop {
            let id = TransactionId::generate();
            if !transactions.iter().any(|tx| tx.id == id) {
                break id;
            }
        };
        let tx = new.into_transaction(id);
        transactions.push(tx.clone());
        Ok(tx)
    }

    async fn update(
        &self,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        let mut transactions = self.transactions.write().await;
        let tx = transactions
            .iter_mut()
            .find(|tx| &tx.id == id)
            .ok_or_else(EngineError::transaction_not_found)?;
        patch.apply(tx);
        Ok(tx.clone())
    }

    async fn delete(&self, id: &TransactionId) -> ResultEngine<()> {
        let mut transactions = self.transactions.write().await;
        let index = transactions
            .iter()
            .position(|tx| &tx.id == id)
            .ok_or_else(EngineError::transaction_not_found)?;
        transactions.remove(index);
        Ok(())
    }
}
