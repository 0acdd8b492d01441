use crate::config::Config;
use crate::domain::card::Card;
use crate::domain::query::QueryParams;
use crate::ports::outbound::card_api::{ApiError, CardApi};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const ORACLE_CARDS: &str = "oracle_cards";

#[derive(Debug, Deserialize)]
struct CardList {
    data: Vec<Card>,
    #[serde(default)]
    has_more: bool,
    next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BulkDataList {
    data: Vec<BulkData>,
}

#[derive(Debug, Deserialize)]
struct BulkData {
    #[serde(rename = "type")]
    kind: String,
    download_uri: String,
}

pub struct Scryfall {
    http_client: reqwest::Client,
    base_url: String,
}

impl Scryfall {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("deckforge/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|why| ApiError::Network(format!("could not build HTTP client: {why}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, url: &str) -> Result<Response, ApiError> {
        log::debug!("GET {url}");
        let response = self.http_client.get(url).send().await.map_err(request_error)?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(url.to_string())),
            status => Err(ApiError::Network(format!("{url} answered {status}"))),
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let bytes = self.get(url).await?.bytes().await.map_err(request_error)?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let bytes = self.get_bytes(url).await?;
        serde_json::from_slice(&bytes).map_err(|why| ApiError::Decode(format!("{url}: {why}")))
    }
}

/// Anything reqwest reports, including a body cut short, is a transport failure.
fn request_error(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

fn oracle_cards_uri(list: BulkDataList) -> Result<String, ApiError> {
    list.data
        .into_iter()
        .find(|bulk| bulk.kind == ORACLE_CARDS)
        .map(|bulk| bulk.download_uri)
        .ok_or_else(|| ApiError::Decode(format!("bulk data has no {ORACLE_CARDS} entry")))
}

#[async_trait]
impl CardApi for Scryfall {
    async fn fetch_card(&self, id: &str) -> Result<Card, ApiError> {
        self.get_json(&format!("{}/cards/{id}", self.base_url)).await
    }

    async fn search(&self, query: &QueryParams) -> Result<Vec<Card>, ApiError> {
        let Some(remote_query) = query.remote_query() else {
            return Ok(Vec::new());
        };

        let first_page = reqwest::Url::parse_with_params(
            &format!("{}/cards/search", self.base_url),
            &[("q", remote_query.as_str())],
        )
        .map_err(|why| ApiError::Network(format!("bad search url: {why}")))?;

        let mut cards = Vec::new();
        let mut next = Some(first_page.to_string());
        while let Some(url) = next.take() {
            let page: CardList = match self.get_json(&url).await {
                Ok(page) => page,
                Err(ApiError::NotFound(_)) => break,
                Err(why) => return Err(why),
            };
            cards.extend(page.data);
            if page.has_more {
                next = page.next_page;
            }
        }

        Ok(cards)
    }

    async fn bulk_snapshot(&self) -> Result<Vec<Card>, ApiError> {
        let list: BulkDataList = self.get_json(&format!("{}/bulk-data", self.base_url)).await?;
        let uri = oracle_cards_uri(list)?;
        log::info!("Downloading {ORACLE_CARDS} from {uri}");

        self.get_json(&uri).await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(url).await
    }
}

pub fn init_card_api(config: &Config) -> Result<impl CardApi, ApiError> {
    Scryfall::new(&config.scryfall_api_url, config.http_timeout)
}
