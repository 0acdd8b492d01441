pub mod browser;
pub mod scryfall;
pub mod storage;
