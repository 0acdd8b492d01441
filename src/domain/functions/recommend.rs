use crate::domain::app::App;
use crate::domain::card::Card;
use crate::domain::error::{Error, Result};
use crate::domain::functions::generate::ensure_commander;
use crate::domain::recommendations::Synergies;
use crate::ports::outbound::browser::Browser;
use crate::ports::outbound::card_api::CardApi;
use crate::ports::outbound::storage::Storage;

impl<A, S, B> App<A, S, B>
where
    A: CardApi + Send + Sync,
    S: Storage + Send + Sync,
    B: Browser + Send + Sync,
{
    /// Cached synergies for a commander, scraping them when absent and
    /// `allow_remote` is set.
    pub async fn get_recommendations(&self, commander_id: &str, allow_remote: bool) -> Result<Synergies> {
        if let Some(synergies) = self.recommendations.get(commander_id).await {
            log::debug!("Cache hit for recommendations of {commander_id}");
            return Ok(synergies);
        }

        if !allow_remote {
            return Err(Error::NotFound(format!(
                "no cached recommendations for {commander_id}"
            )));
        }

        self.refresh_recommendations(commander_id).await
    }

    /// Scrapes the commander's page and overwrites any cached entry.
    pub async fn refresh_recommendations(&self, commander_id: &str) -> Result<Synergies> {
        let commander = self.cards.resolve_by_id(commander_id).await?;

        let mut synergies = Synergies::new();
        for scraped in self.scraper.commander_cards(&commander.name).await? {
            let card = self.cards.resolve_by_exact_name(&scraped.name).await?;
            synergies.insert(card.id, scraped.synergy);
        }

        self.recommendations.store(commander_id, synergies).await
    }

    /// Resolved recommendations for a legendary creature, strongest first,
    /// keeping only scores of at least `min_synergy`.
    pub async fn recommendations_for(
        &self,
        commander: &Card,
        min_synergy: u8,
        allow_remote: bool,
    ) -> Result<Vec<(Card, u8)>> {
        ensure_commander(commander)?;

        let synergies = self.get_recommendations(&commander.id, allow_remote).await?;
        let mut ranked = Vec::with_capacity(synergies.len());
        for (id, score) in ranked_ids(&synergies) {
            if score < min_synergy {
                continue;
            }
            ranked.push((self.cards.card_by_id(id, allow_remote).await?, score));
        }

        Ok(ranked)
    }

    /// Broadly played cards. A local list always wins; otherwise the staples
    /// page is scraped when `allow_remote` is set.
    pub async fn get_staples(&self, allow_remote: bool) -> Result<Vec<Card>> {
        if let Some(ids) = self.recommendations.staples().await {
            log::debug!("Using {} cached staples", ids.len());
            let mut staples = Vec::with_capacity(ids.len());
            for id in &ids {
                staples.push(self.cards.card_by_id(id, allow_remote).await?);
            }
            return Ok(staples);
        }

        if !allow_remote {
            return Err(Error::NotFound(String::from("no cached staples")));
        }

        let mut staples = Vec::new();
        for name in self.scraper.staple_names().await? {
            match self.cards.resolve_by_exact_name(&name).await {
                Ok(card) => staples.push(card),
                Err(Error::NotFound(_)) => log::warn!("Skipping unknown staple '{name}'"),
                Err(why) => return Err(why),
            }
        }

        let ids = staples.iter().map(|card| card.id.clone()).collect();
        self.recommendations.store_staples(ids).await?;

        Ok(staples)
    }
}

/// Descending score, ties broken by ascending card id.
#[must_use]
pub fn ranked_ids(synergies: &Synergies) -> Vec<(&str, u8)> {
    let mut ranked: Vec<(&str, u8)> = synergies
        .iter()
        .map(|(id, score)| (id.as_str(), *score))
        .collect();
    ranked.sort_by(|(left_id, left), (right_id, right)| right.cmp(left).then(left_id.cmp(right_id)));
    ranked
}
