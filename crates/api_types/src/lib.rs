use serde::{Deserialize, Serialize};

pub use money::{Money, ParseMoneyError};

mod money;

pub mod error {
    use super::*;

    /// Body of every non-2xx JSON response.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub error: String,
    }
}

pub mod transaction {
    use std::{fmt, str::FromStr};

    use chrono::NaiveDate;

    use super::*;

    /// Income/outcome classification, fixed at creation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TransactionType {
        Income,
        Outcome,
    }

    impl TransactionType {
        /// Returns the canonical string used on the wire.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Outcome => "outcome",
            }
        }
    }

    impl fmt::Display for TransactionType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[error("unknown transaction type \"{0}\" (expected income or outcome)")]
    pub struct ParseTransactionTypeError(pub String);

    impl FromStr for TransactionType {
        type Err = ParseTransactionTypeError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "income" => Ok(Self::Income),
                "outcome" => Ok(Self::Outcome),
                _ => Err(ParseTransactionTypeError(s.to_string())),
            }
        }
    }

    /// A stored transaction, as returned by every read and write endpoint.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: String,
        pub amount: Money,
        pub category: String,
        #[serde(default)]
        pub description: String,
        /// Calendar date, `YYYY-MM-DD`.
        pub date: NaiveDate,
        #[serde(rename = "type")]
        pub kind: TransactionType,
    }

    /// Request body for `POST /api/transactions`.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NewTransaction {
        pub amount: Money,
        pub category: String,
        #[serde(default)]
        pub description: String,
        pub date: NaiveDate,
        #[serde(rename = "type")]
        pub kind: TransactionType,
    }

    /// Request body for `PUT /api/transactions/{id}`.
    ///
    /// Every field is optional; absent fields keep their stored value.
    /// `type` and `id` are accepted only when they match the stored record.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<Money>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub date: Option<NaiveDate>,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub kind: Option<TransactionType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<String>,
    }

    /// Query string of `GET /api/transactions`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub kind: Option<TransactionType>,
    }
}
