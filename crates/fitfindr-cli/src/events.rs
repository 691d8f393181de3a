//! Event command handlers.

use chrono::Utc;
use clap::Subcommand;
use fitfindr_core::{AppConfig, DateWindow, EventFilter, EventType, EventWithLocation};
use fitfindr_geo::SearchRadius;
use fitfindr_store::{EventSearch, Store};

/// Sub-commands available under `events`.
#[derive(Debug, Subcommand)]
pub enum EventsCommands {
    /// Find events near a place or matching text; lists everything when no
    /// query is given
    Search {
        query: Option<String>,
        /// Only events of this type (class, pickup, other)
        #[arg(long = "type")]
        event_type: Option<EventType>,
        /// Only events starting today, this week, or in the next 30 days
        #[arg(long)]
        date: Option<DateWindow>,
        /// Search radius in miles: 5, 10, 25, 50 or 100
        #[arg(long)]
        radius: Option<SearchRadius>,
    },
}

pub(crate) async fn run(config: &AppConfig, command: EventsCommands) -> anyhow::Result<()> {
    match command {
        EventsCommands::Search {
            query,
            event_type,
            date,
            radius,
        } => {
            run_search(
                config,
                query.as_deref().unwrap_or_default(),
                event_type,
                date,
                radius.unwrap_or_default(),
            )
            .await
        }
    }
}

fn print_event_row(entry: &EventWithLocation, distance_miles: Option<f64>) {
    let distance = distance_miles.map_or_else(String::new, |d| format!("{d:<8.1}"));
    println!(
        "{distance}{:<18}{:<8}{:<36}{}",
        entry.event.start_date_time.format("%Y-%m-%d %H:%M").to_string(),
        entry.event.event_type,
        entry.event.title,
        entry.location.name
    );
}

/// Search events. A non-blank query that geocodes ranks events by their
/// venue's distance; otherwise events are matched on title, description
/// and venue city.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the geocoder cannot be
/// built.
pub(crate) async fn run_search(
    config: &AppConfig,
    query: &str,
    event_type: Option<EventType>,
    date: Option<DateWindow>,
    radius: SearchRadius,
) -> anyhow::Result<()> {
    let store = Store::open(&config.store_path)?;
    let filter = EventFilter::new(event_type, date, Utc::now());

    let center = if query.trim().is_empty() {
        None
    } else {
        let geocoder = fitfindr_geo::build_geocoder(config)?;
        geocoder.geocode_address(query).await
    };

    let result = store.search_events(
        query,
        center.as_ref().map(|c| c.coordinates),
        radius,
        &filter,
    )?;

    if result.is_empty() {
        println!("no events found");
        return Ok(());
    }

    match result {
        EventSearch::Nearby { items, .. } => {
            let label = center.as_ref().map_or(query, |c| c.display_name.as_str());
            println!("within {radius} of {label}:");
            println!("{:<8}{:<18}{:<8}{:<36}VENUE", "MILES", "STARTS", "TYPE", "TITLE");
            for item in &items {
                print_event_row(&item.item, Some(item.distance_miles));
            }
        }
        EventSearch::TextMatch { items } => {
            if !query.trim().is_empty() {
                println!("no geocoding match for '{query}'; showing text matches:");
            }
            println!("{:<18}{:<8}{:<36}VENUE", "STARTS", "TYPE", "TITLE");
            for item in &items {
                print_event_row(item, None);
            }
        }
    }
    Ok(())
}
