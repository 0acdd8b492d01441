use crate::domain::app::App;
use crate::domain::card::Card;
use crate::domain::deck::Deck;
use crate::domain::error::{Error, Result};
use crate::ports::outbound::browser::Browser;
use crate::ports::outbound::card_api::CardApi;
use crate::ports::outbound::storage::Storage;

pub const DECK_SIZE: usize = 100;

pub const LAND_KEY: &str = "land";
pub const RAMP_KEY: &str = "ramp";
pub const BOARD_WIPES_KEY: &str = "boardwipes";
pub const CARD_DRAW_KEY: &str = "carddraw";
pub const REMOVAL_KEY: &str = "removal";

/// Per-category card budgets for a generated deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckOptions {
    pub lands: usize,
    pub ramp: usize,
    pub board_wipes: usize,
    pub card_draw: usize,
    pub removal: usize,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            lands: 33,
            ramp: 10,
            board_wipes: 5,
            card_draw: 10,
            removal: 8,
        }
    }
}

impl DeckOptions {
    /// Defaults with sparse `key=value` overrides applied in order.
    pub fn from_overrides<I, T>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut options = Self::default();

        for pair in overrides {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| Error::Validation(format!("expected key=value, got '{pair}'")))?;
            let value = value
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::Validation(format!("'{value}' is not a card count")))?;

            let budget = match key.trim() {
                LAND_KEY => &mut options.lands,
                RAMP_KEY => &mut options.ramp,
                BOARD_WIPES_KEY => &mut options.board_wipes,
                CARD_DRAW_KEY => &mut options.card_draw,
                REMOVAL_KEY => &mut options.removal,
                other => return Err(Error::Validation(format!("unknown deck option '{other}'"))),
            };
            *budget = value;
        }

        Ok(options)
    }
}

pub(crate) fn ensure_commander(card: &Card) -> Result<()> {
    if card.can_command() {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} is not a legendary creature",
            card.name
        )))
    }
}

/// Fills a deck from ranked recommendations and staples, leaving basic lands
/// to the caller. Returns the deck and the land slots still open.
///
/// Every card added besides the commander lies within the commander's colour
/// identity, and no card is added twice.
pub fn build_deck(
    commander: &Card,
    recommendations: &[(Card, u8)],
    staples: &[Card],
    options: &DeckOptions,
) -> Result<(Deck, usize)> {
    ensure_commander(commander)?;

    let mut deck = Deck::new(format!("Commander deck for {}", commander.name));
    deck.add_card(commander, 1);
    let admissible = |card: &Card| card.is_within_identity_of(commander);

    let mut lands = options.lands;
    let land_candidates = recommendations
        .iter()
        .map(|(card, _)| card)
        .chain(staples.iter());
    for card in land_candidates {
        if lands == 0 {
            break;
        }
        if card.is_land() && admissible(card) && deck.add_singleton(card) {
            lands -= 1;
            log::info!("Adding {} as land ({lands} left)", card.name);
        }
    }

    let mut spells = (DECK_SIZE - 1).saturating_sub(options.lands);
    if spells == 0 {
        return Ok((deck, 0));
    }

    let mut categories: [(&str, usize, fn(&Card) -> bool); 4] = [
        ("ramp", options.ramp, Card::is_ramp),
        ("board wipe", options.board_wipes, Card::is_board_wipe),
        ("card draw", options.card_draw, Card::is_card_draw),
        ("removal", options.removal, Card::is_removal),
    ];
    for card in staples {
        if spells == 0 {
            break;
        }
        if !admissible(card) || deck.contains(&card.id) {
            continue;
        }

        let mut matched = Vec::new();
        for (category, remaining, predicate) in &mut categories {
            if *remaining > 0 && (*predicate)(card) {
                *remaining -= 1;
                matched.push(*category);
            }
        }

        if !matched.is_empty() {
            deck.add_singleton(card);
            spells -= 1;
            log::info!("Adding {} as {}", card.name, matched.join(", "));
        }
    }

    for (card, synergy) in recommendations {
        if spells == 0 {
            break;
        }
        if admissible(card) && deck.add_singleton(card) {
            spells -= 1;
            log::info!("Adding {} as recommendation (synergy {synergy})", card.name);
        }
    }

    Ok((deck, lands))
}

impl<A, S, B> App<A, S, B>
where
    A: CardApi + Send + Sync,
    S: Storage + Send + Sync,
    B: Browser + Send + Sync,
{
    /// Builds a 100-card singleton deck around `commander`, finishing the
    /// mana base with basic lands in proportion to the deck's colour pips.
    pub async fn generate_deck(
        &self,
        commander: &Card,
        options: &DeckOptions,
        allow_remote: bool,
    ) -> Result<Deck> {
        ensure_commander(commander)?;
        log::info!("Generating deck for {}", commander.name);

        let staples = self.get_staples(allow_remote).await?;
        let recommendations = self.recommendations_for(commander, 0, allow_remote).await?;
        let (mut deck, open_land_slots) = build_deck(commander, &recommendations, &staples, options)?;

        for (land, amount) in deck.basic_land_split(open_land_slots) {
            if amount == 0 {
                continue;
            }
            let basic = self.cards.card_named(land, allow_remote).await?;
            log::info!("Adding {amount} {land}");
            deck.add_card(&basic, amount);
        }

        Ok(deck)
    }
}
