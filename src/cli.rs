use clap::{Parser, Subcommand};
use deckforge::domain::card::ImageQuality;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deckforge", about = "Commander deck builder over a local card cache", version)]
pub struct Cli {
    /// Directory holding the card, recommendation and image caches.
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
    /// Never contact the card API or the recommendation site.
    #[arg(long, global = true)]
    pub offline: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Look a card up by id.
    Card { id: String },
    /// Look a card up by its exact name.
    Named { name: String },
    Search {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        set: Option<String>,
    },
    /// Synergy-ranked cards for a commander.
    Recommend {
        commander_id: String,
        #[arg(long = "min-synergy", default_value_t = 0)]
        min_synergy: u8,
        /// Scrape again even when recommendations are cached.
        #[arg(long)]
        refresh: bool,
    },
    Staples,
    /// Build a 100-card deck around a commander.
    Generate {
        commander_id: String,
        /// Budget override such as `land=36`. Keys: land, ramp, boardwipes, carddraw, removal.
        #[arg(long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        json: Option<PathBuf>,
    },
    Stats { deck: PathBuf },
    /// Copy card images for a search or a saved deck into a directory.
    Images {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        set: Option<String>,
        #[arg(long)]
        deck: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "normal")]
        quality: ImageQuality,
    },
    /// Replace the card cache with the latest bulk snapshot.
    UpdateBulk,
}
