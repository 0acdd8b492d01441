pub mod app;
pub mod card;
pub mod card_repository;
pub mod deck;
pub mod error;
pub mod functions;
pub mod query;
pub mod recommendations;
pub mod scraper;
pub mod stats;
pub mod utils;
