use crate::domain::app::App;
use crate::domain::error::Result;
use crate::ports::outbound::browser::Browser;
use crate::ports::outbound::card_api::CardApi;
use crate::ports::outbound::storage::Storage;

impl<A, S, B> App<A, S, B>
where
    A: CardApi + Send + Sync,
    S: Storage + Send + Sync,
    B: Browser + Send + Sync,
{
    /// Replaces the card cache with the remote oracle snapshot.
    pub async fn update_bulk_data(&self) -> Result<usize> {
        log::info!("Downloading bulk card data");
        let snapshot = self.cards.api().bulk_snapshot().await?;
        log::info!("Downloaded {} cards", snapshot.len());

        self.cards.ingest_bulk_snapshot(snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use crate::adapters::outbound::storage::memory::MemoryStorage;
    use crate::domain::app::App;
    use crate::domain::card::Card;
    use crate::domain::card_repository::CARDS_KEY;
    use crate::domain::error::Error;
    use crate::domain::scraper::Scraper;
    use crate::ports::outbound::browser::MockBrowser;
    use crate::ports::outbound::card_api::{ApiError, MockCardApi};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_update_bulk_data_replaces_cache() {
        let mut api = MockCardApi::new();
        api.expect_bulk_snapshot().times(1).returning(|| {
            Ok(vec![
                Card::from_test("sol", "Sol Ring", "Artifact", "{1}", "{T}: Add {C}{C}.", &[]),
                Card::from_test("bolt", "Lightning Bolt", "Instant", "{R}", "", &["R"]),
            ])
        });
        let storage = Arc::new(MemoryStorage::with_file(CARDS_KEY, r#"{"old": {"id": "old", "name": "Old Card"}}"#));
        let app = App::load(api, storage.clone(), Scraper::new(MockBrowser::new(), "https://edhrec.com", 1), 1)
            .await
            .unwrap();
        assert!(app.cards.get("old").await.is_some());

        assert_eq!(app.update_bulk_data().await.unwrap(), 2);
        assert!(app.cards.get("old").await.is_none());
        assert!(app.cards.get("bolt").await.is_some());
        assert!(!storage.contents(CARDS_KEY).unwrap().contains("Old Card"));
    }

    #[tokio::test]
    async fn test_update_bulk_data_keeps_cache_on_failure() {
        let mut api = MockCardApi::new();
        api.expect_bulk_snapshot()
            .returning(|| Err(ApiError::Decode(String::from("truncated body"))));
        let storage = Arc::new(MemoryStorage::with_file(CARDS_KEY, r#"{"old": {"id": "old", "name": "Old Card"}}"#));
        let app = App::load(api, storage, Scraper::new(MockBrowser::new(), "https://edhrec.com", 1), 1)
            .await
            .unwrap();

        assert!(matches!(app.update_bulk_data().await, Err(Error::Network(_))));
        assert_eq!(app.cards.len().await, 1);
    }
}
