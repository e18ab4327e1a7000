use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use inquire::Text;
use skycast_core::{Config, Dashboard, HistoryStore, SearchOutcome, provider_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Look up current conditions and the forecast for a city.
    Search {
        /// City name; prompted for interactively when omitted.
        city: Option<String>,
    },

    /// Show the result of the most recent successful search.
    Last,

    /// List previously searched cities.
    History,

    /// Remove one city from the search history.
    Remove {
        /// City name, matched exactly.
        city: String,
    },

    /// Clear the search history and the stored snapshot.
    Clear,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Search { city } => search(city).await,
            Command::Last => last(),
            Command::History => history(),
            Command::Remove { city } => remove(&city),
            Command::Clear => clear(),
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:").prompt()?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        println!("No key entered, nothing saved.");
        return Ok(());
    }

    config.set_api_key(api_key.to_owned());
    config.save()?;
    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn search(city: Option<String>) -> Result<()> {
    let city = match city {
        Some(city) => city,
        None => Text::new("City:").prompt()?,
    };

    // Empty input stays idle; don't bother loading config for it.
    if city.trim().is_empty() {
        return Ok(());
    }

    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let store = HistoryStore::open_default()?;
    let mut dashboard = Dashboard::new(provider, store);

    match dashboard.search(&city).await {
        Ok(SearchOutcome::Completed(snapshot)) => {
            print!("{}", render::snapshot(&snapshot));
            Ok(())
        }
        Ok(SearchOutcome::Ignored) => Ok(()),
        Err(err) => {
            tracing::debug!(error = %err, "search failed");
            Err(anyhow!(err.user_message()))
        }
    }
}

fn last() -> Result<()> {
    let store = HistoryStore::open_default()?;
    match &store.record().last_snapshot {
        Some(snapshot) => print!("{}", render::snapshot(snapshot)),
        None => println!("No previous search."),
    }
    Ok(())
}

fn history() -> Result<()> {
    let store = HistoryStore::open_default()?;
    let cities = &store.record().cities;

    if cities.is_empty() {
        println!("No cities searched yet.");
    } else {
        for city in cities {
            println!("{city}");
        }
    }
    Ok(())
}

fn remove(city: &str) -> Result<()> {
    let mut store = HistoryStore::open_default()?;
    if store.remove_city(city)? {
        println!("Removed {city} from history.");
    } else {
        println!("{city} is not in the history.");
    }
    Ok(())
}

fn clear() -> Result<()> {
    let mut store = HistoryStore::open_default()?;
    store.clear()?;
    println!("History cleared.");
    Ok(())
}
