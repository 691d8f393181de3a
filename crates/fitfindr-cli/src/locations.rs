//! Venue command handlers.

use clap::Subcommand;
use fitfindr_core::{AppConfig, Location, LocationCategory};
use fitfindr_geo::{GeocodeOutcome, ResolvePolicy, Resolver, SearchRadius};
use fitfindr_store::{GeocodeSelection, LocationSearch, Store};
use uuid::Uuid;

/// Sub-commands available under `locations`.
#[derive(Debug, Subcommand)]
pub enum LocationsCommands {
    /// List venues, newest first
    List {
        /// Only venues of this category (gym, yoga_studio, track, disc_golf, other)
        #[arg(long)]
        category: Option<LocationCategory>,
    },
    /// Find venues near a place, falling back to a name/city/state match
    Search {
        query: String,
        /// Search radius in miles: 5, 10, 25, 50 or 100
        #[arg(long)]
        radius: Option<SearchRadius>,
        #[arg(long)]
        category: Option<LocationCategory>,
    },
    /// Fill in venue coordinates from their addresses
    Geocode {
        /// Geocode a single venue
        #[arg(long, conflicts_with = "all")]
        id: Option<Uuid>,
        /// Re-geocode every venue, not just those missing coordinates
        #[arg(long)]
        all: bool,
        /// Print the venues that would be geocoded and exit
        #[arg(long)]
        dry_run: bool,
    },
}

pub(crate) async fn run(config: &AppConfig, command: LocationsCommands) -> anyhow::Result<()> {
    match command {
        LocationsCommands::List { category } => run_list(config, category),
        LocationsCommands::Search {
            query,
            radius,
            category,
        } => run_search(config, &query, radius.unwrap_or_default(), category).await,
        LocationsCommands::Geocode { id, all, dry_run } => {
            run_geocode(config, id, all, dry_run).await
        }
    }
}

fn open_store(config: &AppConfig) -> anyhow::Result<Store> {
    Ok(Store::open(&config.store_path)?)
}

fn fmt_coordinates(location: &Location) -> String {
    location
        .coordinates()
        .map_or_else(|| "\u{2014}".to_string(), |c| c.to_string())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

fn print_location_header(with_distance: bool) {
    let distance = if with_distance { "MILES   " } else { "" };
    println!(
        "{distance}{:<34}{:<13}{:<20}COORDINATES",
        "NAME", "CATEGORY", "CITY"
    );
}

fn print_location_row(location: &Location, distance_miles: Option<f64>) {
    let distance = distance_miles.map_or_else(String::new, |d| format!("{d:<8.1}"));
    let city = format!("{}, {}", location.address.city, location.address.state);
    println!(
        "{distance}{:<34}{:<13}{:<20}{}",
        truncate(&location.name, 30),
        location.category,
        truncate(&city, 18),
        fmt_coordinates(location)
    );
}

/// Print every venue, optionally filtered by category.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub(crate) fn run_list(
    config: &AppConfig,
    category: Option<LocationCategory>,
) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let locations = store.list_locations(category)?;

    if locations.is_empty() {
        println!("no locations found; run `db seed` first");
        return Ok(());
    }

    print_location_header(false);
    for location in &locations {
        print_location_row(location, None);
    }
    Ok(())
}

/// Geocode `query` and list venues within `radius`, or list text matches
/// when the query does not geocode.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the geocoder cannot be
/// built.
pub(crate) async fn run_search(
    config: &AppConfig,
    query: &str,
    radius: SearchRadius,
    category: Option<LocationCategory>,
) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let geocoder = fitfindr_geo::build_geocoder(config)?;
    let center = geocoder.geocode_address(query).await;

    let result = store.search_locations(
        query,
        center.as_ref().map(|c| c.coordinates),
        radius,
        category,
    )?;

    match result {
        LocationSearch::Nearby { items, .. } => {
            let label = center.as_ref().map_or(query, |c| c.display_name.as_str());
            println!("within {radius} of {label}:");
            if items.is_empty() {
                println!("  no locations in range");
                return Ok(());
            }
            print_location_header(true);
            for item in &items {
                print_location_row(&item.item, Some(item.distance_miles));
            }
        }
        LocationSearch::TextMatch { items } => {
            println!("no geocoding match for '{query}'; showing text matches:");
            if items.is_empty() {
                println!("  no locations match");
                return Ok(());
            }
            print_location_header(false);
            for location in &items {
                print_location_row(location, None);
            }
        }
    }
    Ok(())
}

/// Resolve venue coordinates from their stored addresses and save them.
///
/// With `id`, geocodes that one venue. Otherwise walks every venue missing
/// coordinates, or every venue when `all` is set, printing one line per
/// venue and a summary.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the venue id is unknown,
/// the geocoder cannot be built, or every venue in a bulk run failed.
pub(crate) async fn run_geocode(
    config: &AppConfig,
    id: Option<Uuid>,
    all: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut store = open_store(config)?;

    let targets = match id {
        Some(id) => {
            let location = store
                .get_location(id)?
                .ok_or_else(|| anyhow::anyhow!("location '{id}' not found"))?;
            vec![fitfindr_geo::GeocodeTarget::from(&location)]
        }
        None => {
            let selection = if all {
                GeocodeSelection::All
            } else {
                GeocodeSelection::MissingCoordinates
            };
            store.geocode_targets(selection)?
        }
    };

    if targets.is_empty() {
        println!("no locations need geocoding");
        return Ok(());
    }

    if dry_run {
        println!("dry-run: would geocode {} location(s):", targets.len());
        for target in &targets {
            println!("  {} \u{2014} {}", target.name, target.address.full_address());
        }
        return Ok(());
    }

    let geocoder = fitfindr_geo::build_geocoder(config)?;
    let resolver = Resolver::new(&geocoder, ResolvePolicy::from_config(config));

    println!("Geocoding {} location(s)...", targets.len());
    let report = resolver.run_batch(&targets, &mut store).await;

    for entry in &report.entries {
        match (&entry.outcome, &entry.persist_error) {
            (
                GeocodeOutcome::Success {
                    coordinates,
                    address_used,
                    ..
                },
                None,
            ) => {
                println!(
                    "  \u{2713} {:<30} {coordinates}  [{address_used}]",
                    truncate(&entry.name, 30)
                );
            }
            (GeocodeOutcome::Success { .. }, Some(err)) => {
                println!("  \u{2717} {:<30} resolved but not saved: {err}", truncate(&entry.name, 30));
            }
            (GeocodeOutcome::Failure { reason }, _) => {
                println!("  \u{2717} {:<30} {reason}", truncate(&entry.name, 30));
            }
        }
    }

    println!(
        "Run complete: {} total, {} succeeded, {} failed",
        report.total(),
        report.succeeded(),
        report.failed()
    );

    if report.succeeded() == 0 {
        anyhow::bail!("all {} locations failed to geocode", report.total());
    }
    Ok(())
}
