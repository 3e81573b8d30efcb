//! Client side of cashbook: HTTP access, query cache, form validation and the
//! per-category breakdown, shared by every front end.

pub mod aggregation;
pub mod cache;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod sync;
pub mod validation;

pub use client::{Client, ClientError, TransactionService};
pub use error::{AppError, Result};
