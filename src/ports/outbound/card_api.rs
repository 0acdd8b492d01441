use crate::domain::card::Card;
use crate::domain::query::QueryParams;
use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, derive(Clone))]
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Remote has no record of {0}")]
    NotFound(String),
    #[error("Could not reach the card API: {0}")]
    Network(String),
    #[error("Unreadable card API response: {0}")]
    Decode(String),
}

/// Remote card database. `Network` means no usable answer was obtained
/// (unreachable host, timeout, server failure), so callers can fall back to
/// the local cache; a definitive "no such card" is always `NotFound`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CardApi {
    async fn fetch_card(&self, id: &str) -> Result<Card, ApiError>;
    async fn search(&self, query: &QueryParams) -> Result<Vec<Card>, ApiError>;
    async fn bulk_snapshot(&self) -> Result<Vec<Card>, ApiError>;
    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}
