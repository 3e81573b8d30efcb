//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a transaction does not exist.
//! - [`ImmutableField`] thrown when an update tries to change a fixed field.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ImmutableField`]: EngineError::ImmutableField
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("{0} cannot be changed")]
    ImmutableField(String),
    #[error("Invalid transaction kind: {0}")]
    InvalidKind(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    pub(crate) fn transaction_not_found() -> Self {
        Self::KeyNotFound("Transaction".to_string())
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ImmutableField(a), Self::ImmutableField(b)) => a == b,
            (Self::InvalidKind(a), Self::InvalidKind(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
