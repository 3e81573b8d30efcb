#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use api_types::{
    Money,
    transaction::{NewTransaction, Transaction, TransactionType, TransactionUpdate},
};
use async_trait::async_trait;
use cashbook_client::{ClientError, TransactionService};
use chrono::NaiveDate;

#[derive(Debug, Default)]
pub struct FakeState {
    pub transactions: Vec<Transaction>,
    pub next_id: u32,
    pub list_calls: usize,
    pub create_calls: usize,
    pub update_calls: usize,
    pub delete_calls: usize,
    /// Number of upcoming calls (of any kind) that fail.
    pub failures: usize,
    /// How long every call waits before answering.
    pub delay: Option<Duration>,
}

/// In-process stand-in for the HTTP service.
#[derive(Debug, Clone, Default)]
pub struct FakeService {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeService {
    pub fn fail_next(&self, calls: usize) {
        self.state.lock().unwrap().failures = calls;
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state.lock().unwrap().delay = delay;
    }

    async fn wait(&self) {
        let delay = self.state.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn update_calls(&self) -> usize {
        self.state.lock().unwrap().update_calls
    }
}

fn take_failure(state: &mut FakeState) -> Result<(), ClientError> {
    if state.failures > 0 {
        state.failures -= 1;
        return Err(ClientError::FetchFailed {
            status: 503,
            message: "service unavailable".to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl TransactionService for FakeService {
    async fn list(
        &self,
        filter: Option<TransactionType>,
    ) -> Result<Vec<Transaction>, ClientError> {
        self.wait().await;
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        take_failure(&mut state)?;
        Ok(state
            .transactions
            .iter()
            .filter(|tx| filter.is_none_or(|kind| tx.kind == kind))
            .cloned()
            .collect())
    }

    async fn create(&self, new: NewTransaction) -> Result<Transaction, ClientError> {
        self.wait().await;
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        take_failure(&mut state)?;
        state.next_id += 1;
        let tx = Transaction {
            id: state.next_id.to_string(),
            amount: new.amount,
            category: new.category,
            description: new.description,
            date: new.date,
            kind: new.kind,
        };
        state.transactions.push(tx.clone());
        Ok(tx)
    }

    async fn update(
        &self,
        id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction, ClientError> {
        self.wait().await;
        let mut state = self.state.lock().unwrap();
        state.update_calls += 1;
        take_failure(&mut state)?;
        let tx = state
            .transactions
            .iter_mut()
            .find(|tx| tx.id == id)
            .ok_or_else(|| ClientError::NotFound("Transaction not found".to_string()))?;
        if let Some(amount) = update.amount {
            tx.amount = amount;
        }
        if let Some(category) = update.category {
            tx.category = category;
        }
        if let Some(description) = update.description {
            tx.description = description;
        }
        if let Some(date) = update.date {
            tx.date = date;
        }
        Ok(tx.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.wait().await;
        let mut state = self.state.lock().unwrap();
        state.delete_calls += 1;
        take_failure(&mut state)?;
        let before = state.transactions.len();
        state.transactions.retain(|tx| tx.id != id);
        if state.transactions.len() == before {
            return Err(ClientError::NotFound("Transaction not found".to_string()));
        }
        Ok(())
    }
}

pub fn new_transaction(kind: TransactionType, category: &str, amount: i64) -> NewTransaction {
    NewTransaction {
        amount: Money::new(amount * 100),
        category: category.to_string(),
        description: String::new(),
        date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        kind,
    }
}
