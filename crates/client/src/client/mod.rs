//! HTTP access to the transactions API.

use api_types::{
    error::ErrorResponse,
    transaction::{
        NewTransaction, Transaction, TransactionListQuery, TransactionType, TransactionUpdate,
    },
};
use async_trait::async_trait;
use reqwest::{Response, Url};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    NotFound(String),
    #[error("request failed ({status}): {message}")]
    FetchFailed { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid base_url: {0}")]
    InvalidUrl(String),
}

/// The four operations the client can ask of the transactions store.
///
/// Implementations only move data: no retries, no caching.
#[async_trait]
pub trait TransactionService: Send + Sync {
    async fn list(
        &self,
        filter: Option<TransactionType>,
    ) -> Result<Vec<Transaction>, ClientError>;

    async fn create(&self, new: NewTransaction) -> Result<Transaction, ClientError>;

    async fn update(
        &self,
        id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn collection_url(&self) -> Result<Url, ClientError> {
        self.base_url
            .join("api/transactions")
            .map_err(|err| ClientError::InvalidUrl(err.to_string()))
    }

    fn item_url(&self, id: &str) -> Result<Url, ClientError> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .push(id);
        Ok(url)
    }
}

/// Turns a non-2xx response into a [`ClientError`], reading the
/// `{ "error": ... }` body when there is one.
async fn error_from(res: Response) -> ClientError {
    let status = res.status();
    let message = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    match status.as_u16() {
        404 => ClientError::NotFound(message),
        status => ClientError::FetchFailed { status, message },
    }
}

#[async_trait]
impl TransactionService for Client {
    async fn list(
        &self,
        filter: Option<TransactionType>,
    ) -> Result<Vec<Transaction>, ClientError> {
        let res = self
            .http
            .get(self.collection_url()?)
            .query(&TransactionListQuery { kind: filter })
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(res.json::<Vec<Transaction>>().await?);
        }
        Err(error_from(res).await)
    }

    async fn create(&self, new: NewTransaction) -> Result<Transaction, ClientError> {
        let res = self
            .http
            .post(self.collection_url()?)
            .json(&new)
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(res.json::<Transaction>().await?);
        }
        Err(error_from(res).await)
    }

    async fn update(
        &self,
        id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction, ClientError> {
        let res = self
            .http
            .put(self.item_url(id)?)
            .json(&update)
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(res.json::<Transaction>().await?);
        }
        Err(error_from(res).await)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let res = self.http.delete(self.item_url(id)?).send().await?;

        if res.status().is_success() {
            return Ok(());
        }
        Err(error_from(res).await)
    }
}
