use crate::domain::card::Card;
use crate::domain::error::{Error, Result};
use crate::domain::query::QueryParams;
use crate::ports::outbound::card_api::{ApiError, CardApi};
use crate::ports::outbound::storage::Storage;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const CARDS_KEY: &str = "all_cards.json";

/// Durable id → card map backed by the remote card API.
///
/// Records are first-write-wins: once an id is cached its content is never
/// replaced, except by [`CardRepository::ingest_bulk_snapshot`]. Every insert
/// is flushed to storage before the write lock is released.
pub struct CardRepository<A, S> {
    api: A,
    storage: Arc<S>,
    cards: RwLock<BTreeMap<String, Card>>,
}

impl<A, S> CardRepository<A, S>
where
    A: CardApi + Send + Sync,
    S: Storage + Send + Sync,
{
    pub async fn load(api: A, storage: Arc<S>) -> Result<Self> {
        let cards = match storage.read(CARDS_KEY).await? {
            Some(bytes) => serde_json::from_slice::<BTreeMap<String, Card>>(&bytes)?,
            None => BTreeMap::new(),
        };
        log::info!("Loaded {} cached cards", cards.len());

        Ok(Self {
            api,
            storage,
            cards: RwLock::new(cards),
        })
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn len(&self) -> usize {
        self.cards.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cards.read().await.is_empty()
    }

    /// Cached card only, no remote call.
    pub async fn get(&self, id: &str) -> Option<Card> {
        self.cards.read().await.get(id).cloned()
    }

    pub async fn resolve_by_id(&self, id: &str) -> Result<Card> {
        if let Some(card) = self.get(id).await {
            log::debug!("Cache hit for card {id}");
            return Ok(card);
        }

        log::info!("Card {id} not cached, fetching it");
        let card = self.api.fetch_card(id).await.map_err(|why| match why {
            ApiError::NotFound(_) => Error::NotFound(format!("card with id {id}")),
            other => Error::from(other),
        })?;

        if card.id.is_empty() {
            log::warn!("Fetched card {} has no id, not caching it", card.name);
            return Ok(card);
        }

        self.insert_all(std::slice::from_ref(&card)).await?;
        Ok(self.get(&card.id).await.unwrap_or(card))
    }

    pub async fn resolve_by_exact_name(&self, name: &str) -> Result<Card> {
        if let Some(card) = self.find_named(name).await {
            return Ok(card);
        }

        log::info!("No cached card named '{name}', searching remotely");
        let candidates = match self.api.search(&QueryParams::named(name)).await {
            Ok(candidates) => candidates,
            Err(ApiError::NotFound(_)) => Vec::new(),
            Err(why) => return Err(why.into()),
        };
        self.insert_all(&candidates).await?;

        let Some(found) = candidates.into_iter().find(|card| card.has_name(name)) else {
            return Err(Error::NotFound(format!("card named '{name}'")));
        };

        Ok(self.get(&found.id).await.unwrap_or(found))
    }

    /// [`CardRepository::resolve_by_id`], or a cache-only lookup when
    /// `allow_remote` is unset.
    pub async fn card_by_id(&self, id: &str, allow_remote: bool) -> Result<Card> {
        if allow_remote {
            return self.resolve_by_id(id).await;
        }
        self.get(id)
            .await
            .ok_or_else(|| Error::NotFound(format!("card with id {id} is not cached")))
    }

    /// [`CardRepository::resolve_by_exact_name`], or a cache-only lookup when
    /// `allow_remote` is unset.
    pub async fn card_named(&self, name: &str, allow_remote: bool) -> Result<Card> {
        if allow_remote {
            return self.resolve_by_exact_name(name).await;
        }
        self.find_named(name)
            .await
            .ok_or_else(|| Error::NotFound(format!("card named '{name}' is not cached")))
    }

    /// Replaces the whole cache with a full snapshot.
    pub async fn ingest_bulk_snapshot(&self, records: Vec<Card>) -> Result<usize> {
        let snapshot: BTreeMap<String, Card> = records
            .into_iter()
            .filter(|card| !card.id.is_empty())
            .map(|card| (card.id.clone(), card))
            .collect();

        let mut cards = self.cards.write().await;
        self.flush(&snapshot).await?;
        *cards = snapshot;
        log::info!("Replaced card cache with {} cards", cards.len());

        Ok(cards.len())
    }

    pub async fn query(&self, params: &QueryParams) -> Vec<Card> {
        self.cards
            .read()
            .await
            .values()
            .filter(|card| params.matches(card))
            .cloned()
            .collect()
    }

    /// Remote search that caches its results, falling back to the local
    /// cache when the API cannot be reached.
    pub async fn search(&self, params: &QueryParams) -> Result<Vec<Card>> {
        if params.remote_query().is_none() {
            return Ok(self.query(params).await);
        }

        match self.api.search(params).await {
            Ok(cards) => {
                log::info!("Fetched {} cards", cards.len());
                self.insert_all(&cards).await?;
                Ok(cards.into_iter().filter(|card| params.matches(card)).collect())
            }
            Err(ApiError::NotFound(_)) => Ok(Vec::new()),
            Err(ApiError::Network(why)) => {
                log::warn!("Card API unreachable ({why}), searching cached cards");
                Ok(self.query(params).await)
            }
            Err(why) => Err(why.into()),
        }
    }

    /// Cached card with this exact name, no remote call.
    pub async fn find_named(&self, name: &str) -> Option<Card> {
        self.cards
            .read()
            .await
            .values()
            .find(|card| card.has_name(name))
            .cloned()
    }

    async fn insert_all(&self, fetched: &[Card]) -> Result<()> {
        let mut cards = self.cards.write().await;
        let mut added = Vec::new();
        for card in fetched.iter().filter(|card| !card.id.is_empty()) {
            if !cards.contains_key(&card.id) {
                cards.insert(card.id.clone(), card.clone());
                added.push(card.id.clone());
            }
        }

        if added.is_empty() {
            return Ok(());
        }

        if let Err(why) = self.flush(&cards).await {
            for id in &added {
                cards.remove(id);
            }
            return Err(why);
        }
        log::info!("Added {} cards to the card cache", added.len());

        Ok(())
    }

    async fn flush(&self, cards: &BTreeMap<String, Card>) -> Result<()> {
        let bytes = serde_json::to_vec(cards)?;
        self.storage.write(CARDS_KEY, &bytes).await?;
        Ok(())
    }
}
