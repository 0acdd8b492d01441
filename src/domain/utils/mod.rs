use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

const FACE_SEPARATOR: &str = " // ";

pub static REGEX_COLLECTION: LazyLock<RegexCollection> = LazyLock::new(|| {
    let slug_disallowed = Regex::new(r"[^a-z0-9\s-]").expect("Invalid regex");
    let whitespace = Regex::new(r"\s+").expect("Invalid regex");
    RegexCollection {
        slug_disallowed,
        whitespace,
    }
});

pub struct RegexCollection {
    pub slug_disallowed: Regex,
    pub whitespace: Regex,
}

/// Page slug for a commander name: front face only, accents folded,
/// lower-cased, punctuation dropped and spaces turned into hyphens.
#[must_use]
pub fn commander_slug(name: &str) -> String {
    let front = name.split(FACE_SEPARATOR).next().unwrap_or(name);
    let folded = front
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase();
    let stripped = REGEX_COLLECTION.slug_disallowed.replace_all(&folded, "");
    REGEX_COLLECTION
        .whitespace
        .replace_all(stripped.trim(), "-")
        .into_owned()
}
