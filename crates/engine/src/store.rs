//! Storage backends for transactions.
//!
//! The store is the only writer of persisted state. It performs no business
//! validation: callers are expected to validate drafts before creating or
//! updating a transaction.

use std::fmt;

use async_trait::async_trait;

use crate::{
    NewTransaction, ResultEngine, Transaction, TransactionId, TransactionKind, TransactionPatch,
};

pub use database::DatabaseStore;
pub use memory::MemoryStore;

mod database;
mod memory;

/// Repository of transactions.
///
/// Implementations keep insertion order and never re-sort.
#[async_trait]
pub trait TransactionStore: Send + Sync + fmt::Debug {
    /// Returns every transaction, or only those of `kind` when given.
    async fn list(&self, kind: Option<TransactionKind>) -> ResultEngine<Vec<Transaction>>;

    /// Returns a single transaction.
    async fn get(&self, id: &TransactionId) -> ResultEngine<Transaction>;

    /// Assigns a fresh id to `new`, appends it and returns the stored record.
    async fn create(&self, new: NewTransaction) -> ResultEngine<Transaction>;

    /// Merges `patch` over the stored record and returns the result.
    async fn update(
        &self,
        id: &TransactionId,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction>;

    /// Removes the transaction permanently.
    async fn delete(&self, id: &TransactionId) -> ResultEngine<()>;
}
