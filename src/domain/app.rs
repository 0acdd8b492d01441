use crate::domain::card_repository::CardRepository;
use crate::domain::error::Result;
use crate::domain::recommendations::RecommendationCache;
use crate::domain::scraper::Scraper;
use crate::ports::outbound::browser::Browser;
use crate::ports::outbound::card_api::CardApi;
use crate::ports::outbound::storage::Storage;
use std::sync::Arc;

pub struct App<A, S, B> {
    pub cards: CardRepository<A, S>,
    pub recommendations: RecommendationCache<S>,
    pub scraper: Scraper<B>,
    pub storage: Arc<S>,
    pub download_concurrency: usize,
}

impl<A, S, B> App<A, S, B>
where
    A: CardApi + Send + Sync,
    S: Storage + Send + Sync,
    B: Browser + Send + Sync,
{
    /// Loads both caches from `storage`. Missing cache files start empty.
    pub async fn load(
        api: A,
        storage: Arc<S>,
        scraper: Scraper<B>,
        download_concurrency: usize,
    ) -> Result<Self> {
        let cards = CardRepository::load(api, storage.clone()).await?;
        let recommendations = RecommendationCache::load(storage.clone()).await?;

        Ok(Self {
            cards,
            recommendations,
            scraper,
            storage,
            download_concurrency: download_concurrency.max(1),
        })
    }
}
