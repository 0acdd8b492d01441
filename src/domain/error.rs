use crate::ports::outbound::browser::BrowserError;
use crate::ports::outbound::card_api::ApiError;
use crate::ports::outbound::storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not find {0}")]
    NotFound(String),
    #[error("Network failure: {0}")]
    Network(String),
    #[error("Scrape failed: {0}")]
    Scrape(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl Error {
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound(what) => Error::NotFound(what),
            ApiError::Network(why) | ApiError::Decode(why) => Error::Network(why),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<BrowserError> for Error {
    fn from(err: BrowserError) -> Self {
        Error::Scrape(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Persistence(format!("malformed cache file: {err}"))
    }
}
