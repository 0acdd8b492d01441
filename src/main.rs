mod cli;

use crate::cli::{Cli, Command};
use clap::Parser;
use deckforge::adapters::outbound::browser::{init_chromium, init_fixture};
use deckforge::adapters::outbound::scryfall::init_card_api;
use deckforge::adapters::outbound::storage::init_storage;
use deckforge::config::{BrowserBackend, Config};
use deckforge::domain::app::App;
use deckforge::domain::card::Card;
use deckforge::domain::error::Result;
use deckforge::domain::functions::generate::DeckOptions;
use deckforge::domain::query::QueryParams;
use deckforge::domain::scraper::Scraper;
use deckforge::domain::stats::DeckStats;
use deckforge::ports::outbound::browser::Browser;
use dotenv::dotenv;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(why) => {
            log::error!("Bad configuration: {why}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(data_dir) = cli.data_dir.clone() {
        config.data_dir = data_dir;
    }

    let result = match config.browser {
        BrowserBackend::Chromium => run(cli, &config, init_chromium(&config)).await,
        BrowserBackend::Fixture => run(cli, &config, init_fixture(&config)).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            log::error!("{why}");
            ExitCode::FAILURE
        }
    }
}

async fn run<B>(cli: Cli, config: &Config, browser: B) -> Result<()>
where
    B: Browser + Send + Sync,
{
    let api = init_card_api(config)?;
    let storage = Arc::new(init_storage(config));
    let scraper = Scraper::new(browser, &config.edhrec_url, config.render_attempts);
    let app = App::load(api, storage, scraper, config.download_concurrency).await?;
    let online = !cli.offline;

    match cli.command {
        Command::Card { id } => {
            let card = app.cards.card_by_id(&id, online).await?;
            println!("{}", describe(&card));
        }
        Command::Named { name } => {
            let card = app.cards.card_named(&name, online).await?;
            println!("{}", describe(&card));
        }
        Command::Search { name, set } => {
            let params = QueryParams::new(name, set);
            let cards = if online {
                app.cards.search(&params).await?
            } else {
                app.cards.query(&params).await
            };
            for card in &cards {
                println!("{}\t{}\t{}", card.id, card.name, card.set_name);
            }
            log::info!("{} matching cards", cards.len());
        }
        Command::Recommend {
            commander_id,
            min_synergy,
            refresh,
        } => {
            if refresh {
                app.refresh_recommendations(&commander_id).await?;
            }
            let commander = app.cards.card_by_id(&commander_id, online).await?;
            for (card, score) in app.recommendations_for(&commander, min_synergy, online).await? {
                println!("{score:>3}\t{}", card.name);
            }
        }
        Command::Staples => {
            for card in app.get_staples(online).await? {
                println!("{}", card.name);
            }
        }
        Command::Generate {
            commander_id,
            options,
            out,
            json,
        } => {
            let options = DeckOptions::from_overrides(&options)?;
            let commander = app.cards.card_by_id(&commander_id, online).await?;
            let deck = app.generate_deck(&commander, &options, online).await?;

            println!("{}", deck.to_text());
            println!();
            print!("{}", DeckStats::from(&deck));
            if let Some(path) = out {
                deck.save(&path).await?;
                log::info!("Saved deck to {}", path.display());
            }
            if let Some(path) = json {
                deck.save_json(&path).await?;
                log::info!("Saved deck JSON to {}", path.display());
            }
        }
        Command::Stats { deck } => {
            let deck = app.read_deck(&deck, online).await?;
            print!("{}", DeckStats::from(&deck));
        }
        Command::Images {
            name,
            set,
            deck,
            out,
            quality,
        } => {
            let cards = match deck {
                Some(path) => app.read_deck(&path, online).await?.unique_cards().to_vec(),
                None => {
                    let params = QueryParams::new(name, set);
                    if online {
                        app.cards.search(&params).await?
                    } else {
                        app.cards.query(&params).await
                    }
                }
            };
            app.download_images(&cards, quality, &out).await?;
        }
        Command::UpdateBulk => {
            let count = app.update_bulk_data().await?;
            println!("Cached {count} cards");
        }
    }

    Ok(())
}

fn describe(card: &Card) -> String {
    let mut lines = vec![format!("{}  {}", card.name, card.cost()), card.type_line.clone()];
    let text = card.rules_text();
    if !text.is_empty() {
        lines.push(text.into_owned());
    }
    if let (Some(power), Some(toughness)) = (&card.power, &card.toughness) {
        lines.push(format!("{power}/{toughness}"));
    }
    lines.push(format!("{} ({})", card.set_name, card.id));
    lines.join("\n")
}
