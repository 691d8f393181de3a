mod db;
mod events;
mod geocode;
mod locations;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use db::DbCommands;
use events::EventsCommands;
use locations::LocationsCommands;

#[derive(Debug, Parser)]
#[command(name = "fitfindr-cli")]
#[command(about = "FitFindr venue and event command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Geocode a free-text address and print the best match
    Geocode {
        /// Address or place, e.g. "1800 E 6th St, Austin, TX"
        query: String,
    },
    /// Venue listing, search and geocoding
    Locations {
        #[command(subcommand)]
        command: LocationsCommands,
    },
    /// Event search
    Events {
        #[command(subcommand)]
        command: EventsCommands,
    },
    /// Store maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = fitfindr_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = ?config.env, store = %config.store_path.display(), "config loaded");

    let Some(command) = cli.command else {
        println!("fitfindr-cli ready; run with --help for commands");
        return Ok(());
    };

    match command {
        Commands::Geocode { query } => geocode::run_geocode(&config, &query).await,
        Commands::Locations { command } => locations::run(&config, command).await,
        Commands::Events { command } => events::run(&config, command).await,
        Commands::Db { command } => db::run(&config, command),
    }
}
