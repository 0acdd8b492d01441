use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number, got '{value}'")]
    NotANumber { name: &'static str, value: String },
    #[error("{name} must be at least 1")]
    Zero { name: &'static str },
    #[error("unknown browser '{0}', expected 'chromium' or 'fixture'")]
    UnknownBrowser(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserBackend {
    Chromium,
    Fixture,
}

impl FromStr for BrowserBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chromium" => Ok(BrowserBackend::Chromium),
            "fixture" => Ok(BrowserBackend::Fixture),
            other => Err(ConfigError::UnknownBrowser(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub scryfall_api_url: String,
    pub edhrec_url: String,
    pub browser: BrowserBackend,
    pub chrome_path: String,
    pub chrome_port: u16,
    pub fixture_dir: PathBuf,
    pub render_attempts: usize,
    pub download_concurrency: usize,
    pub http_timeout: Duration,
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(Self {
            data_dir: PathBuf::from(text("DATA_DIR", "./deckforge-data")),
            scryfall_api_url: text("SCRYFALL_API_URL", "https://api.scryfall.com"),
            edhrec_url: text("EDHREC_URL", "https://edhrec.com"),
            browser: text("BROWSER", "chromium").parse()?,
            chrome_path: text("CHROME_PATH", "chromium"),
            chrome_port: number(&lookup, "CHROME_PORT", 9222)?,
            fixture_dir: PathBuf::from(text("FIXTURE_DIR", "./fixtures")),
            render_attempts: positive(&lookup, "RENDER_ATTEMPTS", 10)?,
            download_concurrency: positive(&lookup, "DOWNLOAD_CONCURRENCY", 8)?,
            http_timeout: Duration::from_secs(positive(&lookup, "HTTP_TIMEOUT_SECS", 30)?),
        })
    }
}

fn number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber { name, value }),
    }
}

fn positive<T: FromStr + Default + PartialEq>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    let value = number(lookup, name, default)?;
    if value == T::default() {
        return Err(ConfigError::Zero { name });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./deckforge-data"));
        assert_eq!(config.scryfall_api_url, "https://api.scryfall.com");
        assert_eq!(config.edhrec_url, "https://edhrec.com");
        assert_eq!(config.browser, BrowserBackend::Chromium);
        assert_eq!(config.chrome_path, "chromium");
        assert_eq!(config.chrome_port, 9222);
        assert_eq!(config.fixture_dir, PathBuf::from("./fixtures"));
        assert_eq!(config.render_attempts, 10);
        assert_eq!(config.download_concurrency, 8);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATA_DIR", "/var/lib/deckforge"),
            ("BROWSER", "Fixture"),
            ("RENDER_ATTEMPTS", "3"),
            ("CHROME_PORT", " 9333 "),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/deckforge"));
        assert_eq!(config.browser, BrowserBackend::Fixture);
        assert_eq!(config.render_attempts, 3);
        assert_eq!(config.chrome_port, 9333);
    }

    #[test]
    fn test_bad_number() {
        assert_eq!(
            config_from(&[("DOWNLOAD_CONCURRENCY", "lots")]),
            Err(ConfigError::NotANumber {
                name: "DOWNLOAD_CONCURRENCY",
                value: String::from("lots")
            })
        );
        assert!(config_from(&[("CHROME_PORT", "70000")]).is_err());
    }

    #[test]
    fn test_zero_is_rejected() {
        assert_eq!(
            config_from(&[("RENDER_ATTEMPTS", "0")]),
            Err(ConfigError::Zero {
                name: "RENDER_ATTEMPTS"
            })
        );
    }

    #[test]
    fn test_unknown_browser() {
        assert!(matches!(
            config_from(&[("BROWSER", "firefox")]),
            Err(ConfigError::UnknownBrowser(_))
        ));
    }
}
