use crate::domain::deck::Deck;
use std::fmt::{Display, Formatter};

pub const MAX_MANA_VALUE: usize = 10;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeckStats {
    pub card_count: usize,
    pub ramp_count: usize,
    pub board_wipe_count: usize,
    pub card_draw_count: usize,
    pub removal_count: usize,
    pub land_count: usize,
    /// Quantity per integer mana value, index = mana value.
    pub mana_curve: [usize; MAX_MANA_VALUE + 1],
}

impl From<&Deck> for DeckStats {
    fn from(deck: &Deck) -> Self {
        let mut stats = Self::default();

        for (card, amount) in deck.entries() {
            stats.card_count += amount;
            if card.is_ramp() {
                stats.ramp_count += amount;
            }
            if card.is_board_wipe() {
                stats.board_wipe_count += amount;
            }
            if card.is_card_draw() {
                stats.card_draw_count += amount;
            }
            if card.is_removal() {
                stats.removal_count += amount;
            }
            if card.is_land() {
                stats.land_count += amount;
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let mana_value = card.cmc.max(0.0) as usize;
            if let Some(bucket) = stats.mana_curve.get_mut(mana_value) {
                *bucket += amount;
            }
        }

        stats
    }
}

impl Display for DeckStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Card count: {}", self.card_count)?;
        writeln!(f, "\tRamp: {}", self.ramp_count)?;
        writeln!(f, "\tCard draw: {}", self.card_draw_count)?;
        writeln!(f, "\tBoard wipes: {}", self.board_wipe_count)?;
        writeln!(f, "\tRemoval: {}", self.removal_count)?;
        writeln!(f, "\tLands: {}", self.land_count)?;
        for (mana_value, amount) in self.mana_curve.iter().enumerate() {
            let bar = vec!["#"; *amount].join(" ");
            writeln!(f, "{mana_value:>2} {bar}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::Card;

    fn with_cmc(mut card: Card, cmc: f64) -> Card {
        card.cmc = cmc;
        card
    }

    #[test]
    fn test_stats_weighted_by_quantity() {
        let mut deck = Deck::new(String::from("Stats"));
        deck.add_card(&with_cmc(Card::from_test("c", "Commander", "Legendary Creature — Elf", "{2}{G}", "", &["G"]), 3.0), 1);
        deck.add_card(&with_cmc(Card::from_test("r", "Cultivate", "Sorcery", "{2}{G}", "Search your library for up to two basic land cards, reveal those cards, put one onto the battlefield tapped and the other into your hand, then shuffle.", &["G"]), 3.0), 1);
        deck.add_card(&with_cmc(Card::from_test("s", "Sol Ring", "Artifact", "{1}", "{T}: Add {C}{C}.", &[]), 1.0), 1);
        deck.add_card(&with_cmc(Card::from_test("w", "Wrath", "Sorcery", "{2}{W}{W}", "Destroy all creatures.", &["W"]), 4.0), 1);
        deck.add_card(&with_cmc(Card::from_test("d", "Beast Within", "Instant", "{2}{G}", "Destroy target permanent. Draw a card.", &["G"]), 3.0), 1);
        deck.add_card(&Card::from_test("f", "Forest", "Basic Land — Forest", "", "({T}: Add {G}.)", &["G"]), 30);

        let stats = DeckStats::from(&deck);
        assert_eq!(stats.card_count, 35);
        assert_eq!(stats.ramp_count, 1);
        assert_eq!(stats.board_wipe_count, 1);
        assert_eq!(stats.card_draw_count, 1);
        assert_eq!(stats.removal_count, 1);
        assert_eq!(stats.land_count, 30);
        assert_eq!(stats.mana_curve[0], 30);
        assert_eq!(stats.mana_curve[1], 1);
        assert_eq!(stats.mana_curve[3], 3);
        assert_eq!(stats.mana_curve[4], 1);
    }

    #[test]
    fn test_mana_values_above_cap_are_dropped() {
        let mut deck = Deck::new(String::from("Big"));
        deck.add_card(&with_cmc(Card::from_test("e", "Draco", "Creature — Dragon", "{16}", "", &[]), 16.0), 1);
        deck.add_card(&with_cmc(Card::from_test("h", "Half", "Instant", "{½}", "", &[]), 0.5), 1);
        let stats = DeckStats::from(&deck);
        assert_eq!(stats.card_count, 2);
        assert_eq!(stats.mana_curve.iter().sum::<usize>(), 1);
        assert_eq!(stats.mana_curve[0], 1);
    }

    #[test]
    fn test_into_from_deck_reference() {
        let mut deck = Deck::new(String::from("Into"));
        deck.add_card(&Card::from_test("i", "Island", "Basic Land — Island", "", "({T}: Add {U}.)", &["U"]), 2);

        let stats: DeckStats = (&deck).into();
        assert_eq!(stats.land_count, 2);
        assert_eq!(stats, DeckStats::from(&deck));
    }

    #[test]
    fn test_display_lists_every_bucket() {
        let stats = DeckStats {
            card_count: 2,
            mana_curve: [0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            ..DeckStats::default()
        };
        let rendered = stats.to_string();
        assert!(rendered.starts_with("Card count: 2\n"));
        assert!(rendered.contains(" 1 # #\n"));
        assert_eq!(rendered.lines().count(), 6 + MAX_MANA_VALUE + 1);
    }
}
