use crate::domain::app::App;
use crate::domain::deck::{parse_lines, Deck};
use crate::domain::error::{Error, Result};
use crate::ports::outbound::browser::Browser;
use crate::ports::outbound::card_api::CardApi;
use crate::ports::outbound::storage::Storage;
use std::path::Path;

impl<A, S, B> App<A, S, B>
where
    A: CardApi + Send + Sync,
    S: Storage + Send + Sync,
    B: Browser + Send + Sync,
{
    /// Rebuilds a deck from `"<quantity> <name>"` lines, resolving each name.
    pub async fn parse_deck(&self, name: &str, text: &str, allow_remote: bool) -> Result<Deck> {
        let mut deck = Deck::new(name.to_string());
        for (amount, card_name) in parse_lines(text)? {
            let card = self.cards.card_named(&card_name, allow_remote).await?;
            deck.add_card(&card, amount);
        }

        Ok(deck)
    }

    pub async fn read_deck(&self, path: &Path, allow_remote: bool) -> Result<Deck> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|why| Error::Persistence(format!("could not read {}: {why}", path.display())))?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.parse_deck(&name, &text, allow_remote).await
    }
}
