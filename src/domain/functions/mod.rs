pub mod bulk;
pub mod deck_io;
pub mod generate;
pub mod images;
pub mod recommend;
