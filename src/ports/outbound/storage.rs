use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, derive(Clone))]
#[derive(Debug, Error)]
#[error("Storage error: {0}")]
pub struct StorageError(String);

impl StorageError {
    #[must_use]
    pub fn new(msg: String) -> Self {
        Self(msg)
    }
}

/// Flat key-value file store. Keys are relative paths such as
/// `all_cards.json` or `images/<id>_normal.jpg`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Storage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    async fn write(&self, key: &str, contents: &[u8]) -> Result<(), StorageError>;
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;
    async fn export(&self, key: &str, destination: &Path) -> Result<(), StorageError>;
}
