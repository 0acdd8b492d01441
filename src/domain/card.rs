use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Colour letters in mana-cost order, paired with the basic land producing them.
pub const COLOURS: [(char, &str); 5] = [
    ('W', "Plains"),
    ('U', "Island"),
    ('B', "Swamp"),
    ('R', "Mountain"),
    ('G', "Forest"),
];

const FACE_SEPARATOR: &str = " // ";
const BASIC_FETCH_TEXT: &str =
    "your library for a basic land card, put that card onto the battlefield tapped";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageUris {
    pub small: String,
    pub normal: String,
    pub large: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageQuality {
    Small,
    Normal,
    Large,
}

impl Display for ImageQuality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let string = match self {
            ImageQuality::Small => "small",
            ImageQuality::Normal => "normal",
            ImageQuality::Large => "large",
        };

        write!(f, "{string}")
    }
}

impl FromStr for ImageQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(ImageQuality::Small),
            "normal" => Ok(ImageQuality::Normal),
            "large" => Ok(ImageQuality::Large),
            other => Err(format!("unknown image quality '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CardFace {
    pub name: String,
    pub mana_cost: String,
    pub type_line: String,
    pub oracle_text: String,
    pub image_uris: Option<ImageUris>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Card {
    pub id: String,
    pub oracle_id: String,
    pub name: String,
    pub image_uris: Option<ImageUris>,
    pub mana_cost: String,
    pub cmc: f64,
    pub type_line: String,
    pub oracle_text: String,
    pub colors: Vec<String>,
    pub color_identity: Vec<String>,
    pub keywords: Vec<String>,
    pub set: String,
    pub set_name: String,
    pub rarity: String,
    pub power: Option<String>,
    pub toughness: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub card_faces: Vec<CardFace>,
}

impl Card {
    /// Rules text, falling back to the joined faces for multi-faced cards
    /// that carry no top-level oracle text.
    #[must_use]
    pub fn rules_text(&self) -> Cow<'_, str> {
        if !self.oracle_text.is_empty() || self.card_faces.is_empty() {
            return Cow::Borrowed(&self.oracle_text);
        }

        Cow::Owned(
            self.card_faces
                .iter()
                .map(|face| face.oracle_text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    #[must_use]
    pub fn cost(&self) -> Cow<'_, str> {
        if !self.mana_cost.is_empty() || self.card_faces.is_empty() {
            return Cow::Borrowed(&self.mana_cost);
        }

        Cow::Owned(
            self.card_faces
                .iter()
                .map(|face| face.mana_cost.as_str())
                .collect::<String>(),
        )
    }

    #[must_use]
    pub fn image_url(&self, quality: ImageQuality) -> Option<&str> {
        let uris = self
            .image_uris
            .as_ref()
            .or_else(|| self.card_faces.first()?.image_uris.as_ref())?;
        let url = match quality {
            ImageQuality::Small => &uris.small,
            ImageQuality::Normal => &uris.normal,
            ImageQuality::Large => &uris.large,
        };

        (!url.is_empty()).then_some(url.as_str())
    }

    #[must_use]
    pub fn is_creature(&self) -> bool {
        self.type_line.contains("Creature")
    }

    #[must_use]
    pub fn is_legendary(&self) -> bool {
        self.type_line.contains("Legendary")
    }

    #[must_use]
    pub fn is_land(&self) -> bool {
        self.type_line.contains("Land")
    }

    #[must_use]
    pub fn is_basic_land(&self) -> bool {
        self.type_line.contains("Basic Land")
    }

    #[must_use]
    pub fn is_ramp(&self) -> bool {
        let text = self.rules_text();
        (!self.is_land() && text.contains("Add ")) || text.contains(BASIC_FETCH_TEXT)
    }

    #[must_use]
    pub fn is_board_wipe(&self) -> bool {
        let text = self.rules_text();
        text.contains("Destroy all ")
            || text.contains(" damage to each creature")
            || text.contains("All creatures get -")
    }

    #[must_use]
    pub fn is_card_draw(&self) -> bool {
        self.rules_text().to_lowercase().contains("draw ")
    }

    #[must_use]
    pub fn is_removal(&self) -> bool {
        self.rules_text().to_lowercase().contains("destroy target")
    }

    #[must_use]
    pub fn can_command(&self) -> bool {
        self.is_legendary() && self.is_creature()
    }

    /// True when every colour of this card's identity is part of `commander`'s.
    #[must_use]
    pub fn is_within_identity_of(&self, commander: &Card) -> bool {
        self.color_identity
            .iter()
            .all(|colour| commander.color_identity.contains(colour))
    }

    /// Raw occurrences of each colour letter in the mana cost, in [`COLOURS`] order.
    /// Hybrid and phyrexian symbols count once per letter they contain.
    #[must_use]
    pub fn pip_counts(&self) -> [usize; 5] {
        let cost = self.cost();
        COLOURS.map(|(letter, _)| cost.matches(letter).count())
    }

    /// Exact name match that also accepts either face of a `A // B` card,
    /// except when both faces carry the same name.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        if self.name == name {
            return true;
        }

        let faces: Vec<&str> = self.name.split(FACE_SEPARATOR).collect();
        if faces.len() == 2 && faces[0] == faces[1] {
            return false;
        }

        faces.into_iter().any(|face| face == name)
    }

    #[cfg(test)]
    pub fn from_test(id: &str, name: &str, type_line: &str, mana_cost: &str, oracle_text: &str, identity: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            type_line: type_line.to_string(),
            mana_cost: mana_cost.to_string(),
            oracle_text: oracle_text.to_string(),
            color_identity: identity.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }
}
