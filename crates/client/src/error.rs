use thiserror::Error;

use crate::{aggregation::AggregationError, client::ClientError, editor::EditorError};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Client(#[from] ClientError),
    #[error("{0}")]
    Editor(#[from] EditorError),
    #[error("{0}")]
    Aggregation(#[from] AggregationError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
