//! Column lists and row mappers shared by the venue and event queries.
//!
//! Timestamps use rusqlite's chrono encoding, whose text form sorts in time
//! order, so `ORDER BY` and range comparisons work on the raw column.

use std::str::FromStr;

use fitfindr_core::{AddressRecord, Event, Location};
use rusqlite::types::Type;
use rusqlite::Row;

pub(crate) const LOCATION_COLUMNS: &str = "l.id, l.name, l.description, l.category, \
     l.address_line1, l.address_line2, l.city, l.state, l.postal_code, l.country, \
     l.latitude, l.longitude, l.website_url, l.phone, l.created_at";

pub(crate) const EVENT_COLUMNS: &str = "e.id, e.title, e.description, e.event_type, \
     e.location_id, e.start_date_time, e.end_date_time, e.recurring_rule, e.created_at";

/// Number of columns in [`EVENT_COLUMNS`]; joined venue columns start here.
pub(crate) const EVENT_COLUMN_COUNT: usize = 9;

/// Read a text column and parse it, reporting a bad value as a conversion
/// failure on that column.
fn parse_text<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Map [`LOCATION_COLUMNS`] starting at column `start`.
pub(crate) fn location_at(row: &Row<'_>, start: usize) -> rusqlite::Result<Location> {
    Ok(Location {
        id: parse_text(row, start)?,
        name: row.get(start + 1)?,
        description: row.get(start + 2)?,
        category: parse_text(row, start + 3)?,
        address: AddressRecord {
            line1: row.get(start + 4)?,
            line2: row.get(start + 5)?,
            city: row.get(start + 6)?,
            state: row.get(start + 7)?,
            postal_code: row.get(start + 8)?,
            country: row.get(start + 9)?,
        },
        latitude: row.get(start + 10)?,
        longitude: row.get(start + 11)?,
        website_url: row.get(start + 12)?,
        phone: row.get(start + 13)?,
        created_at: row.get(start + 14)?,
    })
}

/// Map [`EVENT_COLUMNS`] starting at column 0.
pub(crate) fn event_at(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: parse_text(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        event_type: parse_text(row, 3)?,
        location_id: parse_text(row, 4)?,
        start_date_time: row.get(5)?,
        end_date_time: row.get(6)?,
        recurring_rule: row.get(7)?,
        created_at: row.get(8)?,
    })
}
