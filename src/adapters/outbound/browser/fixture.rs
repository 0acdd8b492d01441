use crate::ports::outbound::browser::{Browser, BrowserError};
use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

/// Serves pre-recorded tiles from `<dir>/<last path segment>.json`, each file
/// holding a JSON array of tile texts. The selector is ignored.
pub struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn fixture_path(&self, url: &str) -> Result<PathBuf, BrowserError> {
        let parsed = Url::parse(url).map_err(|why| BrowserError::new(format!("bad url {url}: {why}")))?;
        let slug = parsed
            .path_segments()
            .and_then(|segments| segments.filter(|segment| !segment.is_empty()).last())
            .ok_or_else(|| BrowserError::new(format!("{url} has no path to look up")))?;

        Ok(self.dir.join(format!("{slug}.json")))
    }
}

#[async_trait]
impl Browser for Fixture {
    async fn tiles(&self, url: &str, _selector: &str) -> Result<Vec<String>, BrowserError> {
        let path = self.fixture_path(url)?;
        log::debug!("Rendering {url} from {}", path.display());

        let contents = tokio::fs::read(&path)
            .await
            .map_err(|why| BrowserError::new(format!("no fixture at {}: {why}", path.display())))?;
        serde_json::from_slice(&contents)
            .map_err(|why| BrowserError::new(format!("malformed fixture {}: {why}", path.display())))
    }
}
