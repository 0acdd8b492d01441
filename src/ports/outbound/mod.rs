pub mod browser;
pub mod card_api;
pub mod storage;
