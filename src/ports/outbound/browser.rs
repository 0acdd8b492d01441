use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, derive(Clone))]
#[derive(Debug, Error)]
#[error("Browser error: {0}")]
pub struct BrowserError(String);

impl BrowserError {
    #[must_use]
    pub fn new(msg: String) -> Self {
        Self(msg)
    }
}

/// Renders a page and returns the inner text of every element matching
/// `selector`, in document order. One call is one render attempt.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Browser {
    async fn tiles(&self, url: &str, selector: &str) -> Result<Vec<String>, BrowserError>;
}
