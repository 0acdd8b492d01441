use crate::domain::card::Card;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    name: Option<String>,
    set_name: Option<String>,
}

impl QueryParams {
    #[must_use]
    pub fn new(name: Option<String>, set_name: Option<String>) -> Self {
        Self {
            name: name.filter(|name| !name.is_empty()),
            set_name: set_name.filter(|set| !set.is_empty()),
        }
    }

    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::new(Some(name.to_string()), None)
    }

    #[must_use]
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    #[must_use]
    pub fn set_name(&self) -> Option<&String> {
        self.set_name.as_ref()
    }

    /// Conjunctive filter: case-insensitive substring on the card name,
    /// case-sensitive substring on the set name.
    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        if let Some(name) = &self.name {
            if !card.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }

        if let Some(set_name) = &self.set_name {
            if !card.set_name.contains(set_name.as_str()) {
                return false;
            }
        }

        true
    }

    /// Remote fuzzy-search term for the name filter. The set filter is
    /// applied locally with [`QueryParams::matches`] afterwards.
    #[must_use]
    pub fn remote_query(&self) -> Option<String> {
        let name = self.name.as_ref()?;
        Some(format!("name:\"{}\"", name.replace('"', "")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_card() -> Card {
        let mut card = Card::from_test("s", "Sol Ring", "Artifact", "{1}", "{T}: Add {C}{C}.", &[]);
        card.set_name = String::from("Commander 2021");
        card
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(QueryParams::default().matches(&create_test_card()));
    }

    #[test]
    fn test_name_is_case_insensitive_substring() {
        assert!(QueryParams::named("sol r").matches(&create_test_card()));
        assert!(QueryParams::named("RING").matches(&create_test_card()));
        assert!(!QueryParams::named("Mana Crypt").matches(&create_test_card()));
    }

    #[test]
    fn test_set_name_is_case_sensitive_substring() {
        let card = create_test_card();
        assert!(QueryParams::new(None, Some(String::from("Commander"))).matches(&card));
        assert!(!QueryParams::new(None, Some(String::from("commander"))).matches(&card));
    }

    #[test]
    fn test_both_filters_must_match() {
        let card = create_test_card();
        let query = QueryParams::new(Some(String::from("sol")), Some(String::from("Alpha")));
        assert!(!query.matches(&card));
    }

    #[test]
    fn test_empty_strings_are_dropped() {
        let query = QueryParams::new(Some(String::new()), Some(String::new()));
        assert_eq!(query, QueryParams::default());
    }

    #[test]
    fn test_remote_query() {
        let query = QueryParams::new(Some(String::from("Sol \"Ring\"")), Some(String::from("Commander 2021")));
        assert_eq!(query.remote_query().as_deref(), Some("name:\"Sol Ring\""));
        let query = QueryParams::new(None, Some(String::from("Commander 2021")));
        assert_eq!(query.remote_query(), None);
    }
}
