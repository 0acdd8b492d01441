use crate::domain::app::App;
use crate::domain::card::{Card, ImageQuality};
use crate::domain::error::{Error, Result};
use crate::ports::outbound::browser::Browser;
use crate::ports::outbound::card_api::CardApi;
use crate::ports::outbound::storage::Storage;
use futures::{stream, TryStreamExt};
use std::path::Path;

#[must_use]
pub fn image_key(card: &Card, quality: ImageQuality) -> String {
    format!("images/{}_{quality}.jpg", card.id)
}

impl<A, S, B> App<A, S, B>
where
    A: CardApi + Send + Sync,
    S: Storage + Send + Sync,
    B: Browser + Send + Sync,
{
    /// Copies each card's image into `out_dir`, downloading it into the image
    /// cache first when missing. At most `download_concurrency` transfers run
    /// at once and the first failure is returned. Returns the number exported.
    pub async fn download_images(&self, cards: &[Card], quality: ImageQuality, out_dir: &Path) -> Result<usize> {
        let wanted: Vec<(&Card, &str)> = cards
            .iter()
            .filter_map(|card| match card.image_url(quality) {
                Some(url) => Some((card, url)),
                None => {
                    log::warn!("{} has no {quality} image, skipping", card.name);
                    None
                }
            })
            .collect();
        let exported = wanted.len();

        stream::iter(wanted.into_iter().map(Ok::<_, Error>))
            .try_for_each_concurrent(self.download_concurrency, |(card, url)| async move {
                let key = image_key(card, quality);
                if self.storage.exists(&key).await? {
                    log::debug!("Cache hit for {key}");
                } else {
                    log::info!("Downloading {} image for {}", quality, card.name);
                    let bytes = self.cards.api().download(url).await?;
                    self.storage.write(&key, &bytes).await?;
                }

                self.storage.export(&key, out_dir).await?;
                Ok::<(), Error>(())
            })
            .await?;
        log::info!("Exported {exported} images to {}", out_dir.display());

        Ok(exported)
    }
}
