//! Transaction primitives.
//!
//! A `Transaction` is a single recorded income or outcome. Its `id` and
//! `kind` are fixed at creation; everything else can be patched.

use std::fmt;

use api_types::Money;
use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Outcome,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "outcome" => Ok(Self::Outcome),
            other => Err(EngineError::InvalidKind(other.to_string())),
        }
    }
}

/// Opaque transaction identifier assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(String);

impl TransactionId {
    /// Returns a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub kind: TransactionKind,
}

/// A transaction that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub kind: TransactionKind,
}

impl NewTransaction {
    pub(crate) fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            category: self.category,
            description: self.description,
            date: self.date,
            kind: self.kind,
        }
    }
}

/// Partial update of the mutable fields of a transaction.
///
/// `None` keeps the stored value. `id` and `kind` are not patchable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionPatch {
    pub fn apply(self, tx: &mut Transaction) {
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
        if let Some(description) = self.description {
            tx.description = description;
        }
        if let Some(date) = self.date {
            tx.date = date;
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Insertion sequence, keeps list order stable.
    #[sea_orm(primary_key)]
    pub seq: i64,
    #[sea_orm(unique)]
    pub id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub category: String,
    pub description: String,
    pub date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            seq: ActiveValue::NotSet,
            id: ActiveValue::Set(tx.id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            category: ActiveValue::Set(tx.category.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            date: ActiveValue::Set(tx.date),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TransactionId::from(model.id),
            amount: Money::new(model.amount_minor),
            category: model.category,
            description: model.description,
            date: model.date,
            kind: TransactionKind::try_from(model.kind.as_str())?,
        })
    }
}
