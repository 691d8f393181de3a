use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use fitfindr_core::AppConfig;
use fitfindr_store::Store;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Replace the store's contents with the YAML seed file
    Seed {
        /// Seed file; defaults to FITFINDR_SEED_PATH
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub(crate) fn run(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Seed { path } => run_seed(config, path.as_deref()),
    }
}

/// Load the seed file and import it into the store.
///
/// # Errors
///
/// Returns an error if the seed file fails to load or validate, or the
/// store cannot be written.
pub(crate) fn run_seed(config: &AppConfig, path: Option<&std::path::Path>) -> anyhow::Result<()> {
    let seed_path = path.unwrap_or(config.seed_path.as_path());
    let seed = fitfindr_core::load_seed(seed_path)?;

    let mut store = Store::open(&config.store_path)?;
    let summary = store.import_seed(&seed, Utc::now())?;

    println!(
        "seeded {} locations and {} events into {}",
        summary.locations,
        summary.events,
        store.path().display()
    );
    if seed.locations.iter().any(|l| l.location.latitude.is_none()) {
        println!("some locations have no coordinates; run `locations geocode` to fill them in");
    }
    Ok(())
}
