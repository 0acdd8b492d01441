use crate::domain::card::{Card, COLOURS};
use crate::domain::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Ordered list of distinct cards with a quantity per card id.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub name: String,
    cards: Vec<Card>,
    amounts: BTreeMap<String, usize>,
}

impl Deck {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            cards: Vec::new(),
            amounts: BTreeMap::new(),
        }
    }

    /// Adds `amount` copies. A card already present only has its quantity raised.
    pub fn add_card(&mut self, card: &Card, amount: usize) {
        if amount == 0 {
            return;
        }

        match self.amounts.get_mut(&card.id) {
            Some(existing) => *existing += amount,
            None => {
                self.amounts.insert(card.id.clone(), amount);
                self.cards.push(card.clone());
            }
        }
    }

    /// Adds a single copy unless the card is already in the deck.
    pub fn add_singleton(&mut self, card: &Card) -> bool {
        if self.contains(&card.id) {
            return false;
        }
        self.add_card(card, 1);
        true
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.amounts.contains_key(id)
    }

    #[must_use]
    pub fn count(&self, id: &str) -> usize {
        self.amounts.get(id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn unique_cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Card, usize)> {
        self.cards.iter().map(|card| (card, self.count(&card.id)))
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.amounts.values().sum()
    }

    /// Basic lands for `slots` remaining land slots, proportional to the
    /// colour pips across the deck. Any rounding shortfall goes to the basic
    /// with the most pips.
    #[must_use]
    pub fn basic_land_split(&self, slots: usize) -> [(&'static str, usize); 5] {
        let mut split = COLOURS.map(|(_, land)| (land, 0));
        if slots == 0 {
            return split;
        }

        let mut pips = [0usize; 5];
        for (card, amount) in self.entries() {
            for (total, count) in pips.iter_mut().zip(card.pip_counts()) {
                *total += count * amount;
            }
        }

        let all_pips: usize = pips.iter().sum();
        if all_pips == 0 {
            return split;
        }

        for ((_, count), colour_pips) in split.iter_mut().zip(pips) {
            *count = colour_pips * slots / all_pips;
        }

        let allocated: usize = split.iter().map(|(_, count)| count).sum();
        let shortfall = slots - allocated;
        if shortfall > 0 {
            let mut top = 0;
            for (index, colour_pips) in pips.iter().enumerate() {
                if *colour_pips > pips[top] {
                    top = index;
                }
            }
            split[top].1 += shortfall;
        }

        split
    }

    /// `"<quantity> <name>"` per unique card, newline-joined.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.entries()
            .map(|(card, amount)| format!("{amount} {}", card.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Quantity map keyed by card id, pretty-printed.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.amounts)
            .map_err(|why| Error::Persistence(format!("could not serialise deck: {why}")))
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, self.to_text())
            .await
            .map_err(|why| Error::Persistence(format!("could not write {}: {why}", path.display())))
    }

    pub async fn save_json(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, self.to_json()?)
            .await
            .map_err(|why| Error::Persistence(format!("could not write {}: {why}", path.display())))
    }
}

/// Splits deck text into `(quantity, name)` pairs, skipping blank lines.
pub fn parse_lines(text: &str) -> Result<Vec<(usize, String)>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (amount, name) = line
                .split_once(' ')
                .ok_or_else(|| Error::Validation(format!("malformed deck line '{line}'")))?;
            let amount = amount
                .parse::<usize>()
                .ok()
                .filter(|amount| *amount > 0)
                .ok_or_else(|| Error::Validation(format!("bad quantity in deck line '{line}'")))?;
            Ok((amount, name.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plains() -> Card {
        Card::from_test("p", "Plains", "Basic Land — Plains", "", "({T}: Add {W}.)", &["W"])
    }

    fn create_test_deck() -> Deck {
        let mut deck = Deck::new(String::from("Test"));
        deck.add_card(&Card::from_test("a", "Adeline, Resplendent Cathar", "Legendary Creature — Human Knight", "{1}{W}{W}", "", &["W"]), 1);
        deck.add_card(&plains(), 10);
        deck
    }

    #[test]
    fn test_add_card_keeps_one_entry_per_id() {
        let mut deck = create_test_deck();
        deck.add_card(&plains(), 2);
        assert_eq!(deck.unique_cards().len(), 2);
        assert_eq!(deck.count("p"), 12);
        assert_eq!(deck.total_cards(), 13);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut deck = Deck::new(String::from("Empty"));
        deck.add_card(&plains(), 0);
        assert!(deck.unique_cards().is_empty());
        assert!(!deck.contains("p"));
    }

    #[test]
    fn test_add_singleton() {
        let mut deck = Deck::new(String::from("Singleton"));
        assert!(deck.add_singleton(&plains()));
        assert!(!deck.add_singleton(&plains()));
        assert_eq!(deck.count("p"), 1);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut deck = Deck::new(String::from("Order"));
        deck.add_singleton(&Card::from_test("z", "Zur the Enchanter", "Legendary Creature", "", "", &[]));
        deck.add_singleton(&Card::from_test("a", "Arcane Signet", "Artifact", "", "", &[]));
        let names: Vec<&str> = deck.unique_cards().iter().map(|card| card.name.as_str()).collect();
        assert_eq!(names, vec!["Zur the Enchanter", "Arcane Signet"]);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(create_test_deck().to_text(), "1 Adeline, Resplendent Cathar\n10 Plains");
    }

    #[test]
    fn test_to_json_is_keyed_by_id() {
        let json = create_test_deck().to_json().unwrap();
        let parsed: BTreeMap<String, usize> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.get("a"), Some(&1));
        assert_eq!(parsed.get("p"), Some(&10));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_parse_lines() {
        let lines = parse_lines("1 Adeline, Resplendent Cathar\n\n10 Plains\n").unwrap();
        assert_eq!(
            lines,
            vec![
                (1, String::from("Adeline, Resplendent Cathar")),
                (10, String::from("Plains"))
            ]
        );
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        assert!(matches!(parse_lines("Plains"), Err(Error::Validation(_))));
        assert!(matches!(parse_lines("x Plains"), Err(Error::Validation(_))));
        assert!(matches!(parse_lines("0 Plains"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_basic_land_split_proportional_with_remainder() {
        let mut deck = Deck::new(String::from("Azorius"));
        deck.add_card(&Card::from_test("w", "White", "Creature", "{W}{W}{W}", "", &["W"]), 2);
        deck.add_card(&Card::from_test("u", "Blue", "Instant", "{1}{U}", "", &["U"]), 2);

        let split = deck.basic_land_split(10);
        assert_eq!(
            split,
            [("Plains", 8), ("Island", 2), ("Swamp", 0), ("Mountain", 0), ("Forest", 0)]
        );
        assert_eq!(split.iter().map(|(_, count)| count).sum::<usize>(), 10);
    }

    #[test]
    fn test_basic_land_split_no_pips() {
        let mut deck = Deck::new(String::from("Colourless"));
        deck.add_card(&Card::from_test("k", "Karn", "Legendary Creature", "{7}", "", &[]), 1);
        assert!(deck.basic_land_split(20).iter().all(|(_, count)| *count == 0));
    }

    #[test]
    fn test_basic_land_split_zero_slots() {
        assert!(create_test_deck().basic_land_split(0).iter().all(|(_, count)| *count == 0));
    }

    #[test]
    fn test_basic_land_split_counts_hybrid_letters() {
        let mut deck = Deck::new(String::from("Hybrid"));
        deck.add_card(&Card::from_test("h", "Hybrid", "Creature", "{G/U}{G/U}{G/U}", "", &["G", "U"]), 1);
        let split = deck.basic_land_split(7);
        assert_eq!(split[1], ("Island", 4));
        assert_eq!(split[4], ("Forest", 3));
    }

    #[tokio::test]
    async fn test_save_writes_text() {
        let path = std::env::temp_dir().join("deckforge_deck_save_test.txt");
        create_test_deck().save(&path).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, "1 Adeline, Resplendent Cathar\n10 Plains");
        let _ = tokio::fs::remove_file(&path).await;
    }
}
