use crate::domain::error::{Error, Result};
use crate::domain::utils;
use crate::ports::outbound::browser::Browser;

pub const CARD_SELECTOR: &str = "div[class^=\"Card_container__\"]";

const NAME_LINE: usize = 3;
const SYNERGY_LINE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedCard {
    pub name: String,
    pub synergy: u8,
}

/// Pulls ranked card tiles from the recommendation site through a [`Browser`].
pub struct Scraper<B> {
    browser: B,
    base_url: String,
    render_attempts: usize,
}

impl<B> Scraper<B>
where
    B: Browser + Send + Sync,
{
    pub fn new(browser: B, base_url: &str, render_attempts: usize) -> Self {
        Self {
            browser,
            base_url: base_url.trim_end_matches('/').to_string(),
            render_attempts,
        }
    }

    #[must_use]
    pub fn commander_url(&self, name: &str) -> String {
        format!("{}/commanders/{}", self.base_url, utils::commander_slug(name))
    }

    #[must_use]
    pub fn staples_url(&self) -> String {
        format!("{}/top", self.base_url)
    }

    /// Synergy-ranked tiles for a commander. The first tile on the page is
    /// the commander itself and is skipped.
    pub async fn commander_cards(&self, commander_name: &str) -> Result<Vec<ScrapedCard>> {
        let url = self.commander_url(commander_name);
        log::info!("Scraping recommendations for {commander_name} from {url}");

        let tiles = self.render(&url).await?;
        let cards = tiles
            .iter()
            .skip(1)
            .map(|tile| parse_synergy_tile(tile))
            .collect::<Result<Vec<_>>>()?;
        log::info!("Found {} cards for {commander_name}", cards.len());

        Ok(cards)
    }

    /// Names on the staples page. Tiles too short to hold a name are skipped.
    pub async fn staple_names(&self) -> Result<Vec<String>> {
        let url = self.staples_url();
        log::info!("Scraping staples from {url}");

        let names: Vec<String> = self
            .render(&url)
            .await?
            .iter()
            .filter_map(|tile| tile.lines().nth(NAME_LINE).map(|line| line.trim().to_string()))
            .collect();
        log::info!("Found {} staples", names.len());

        Ok(names)
    }

    /// Requests the page until it yields more than one tile, up to the
    /// render-attempt limit. Browser failures end the loop immediately.
    async fn render(&self, url: &str) -> Result<Vec<String>> {
        for attempt in 1..=self.render_attempts {
            let tiles = self.browser.tiles(url, CARD_SELECTOR).await?;
            if tiles.len() > 1 {
                return Ok(tiles);
            }
            log::warn!(
                "{url} rendered {} tiles on attempt {attempt}/{}",
                tiles.len(),
                self.render_attempts
            );
        }

        Err(Error::Scrape(format!(
            "{url} did not render any cards after {} attempts",
            self.render_attempts
        )))
    }
}

/// Reads a tile's text block: line 3 holds the name, line 5 the synergy
/// percentage (e.g. `"34% synergy"`). Scores are clamped into `0..=100`.
pub fn parse_synergy_tile(text: &str) -> Result<ScrapedCard> {
    let lines: Vec<&str> = text.lines().collect();
    let (Some(name), Some(synergy)) = (lines.get(NAME_LINE), lines.get(SYNERGY_LINE)) else {
        return Err(Error::Scrape(format!(
            "card tile has {} lines, expected at least {}",
            lines.len(),
            SYNERGY_LINE + 1
        )));
    };

    let percentage = synergy.split('%').next().unwrap_or_default().trim();
    let synergy = percentage
        .parse::<i32>()
        .map_err(|_| Error::Scrape(format!("unreadable synergy '{synergy}' for {name}")))?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(ScrapedCard {
        name: name.trim().to_string(),
        synergy: synergy.clamp(0, 100) as u8,
    })
}
