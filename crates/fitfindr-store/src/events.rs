//! Event operations. Events are always returned joined with their venue.

use chrono::Utc;
use fitfindr_core::{Coordinates, Event, EventFilter, EventType, EventWithLocation, NewEvent};
use fitfindr_geo::{filter_by_proximity, SearchRadius, WithDistance};
use rusqlite::{params, Connection};
use serde::Serialize;
use uuid::Uuid;

use crate::rows::{event_at, location_at, EVENT_COLUMNS, EVENT_COLUMN_COUNT, LOCATION_COLUMNS};
use crate::{contains_ci, Store, StoreError};

/// Event search results, shaped like [`crate::LocationSearch`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EventSearch {
    Nearby {
        center: Coordinates,
        radius: SearchRadius,
        items: Vec<WithDistance<EventWithLocation>>,
    },
    TextMatch {
        items: Vec<EventWithLocation>,
    },
}

impl EventSearch {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            EventSearch::Nearby { items, .. } => items.len(),
            EventSearch::TextMatch { items } => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn insert_event_row(conn: &Connection, event: &Event) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO events (id, title, description, event_type, location_id,
             start_date_time, end_date_time, recurring_rule, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            event.id.to_string(),
            event.title,
            event.description,
            event.event_type.as_str(),
            event.location_id.to_string(),
            event.start_date_time,
            event.end_date_time,
            event.recurring_rule,
            event.created_at,
        ],
    )?;
    Ok(())
}

impl Store {
    /// Insert an event at an existing venue.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LocationNotFound`] when the venue is unknown,
    /// [`StoreError::Validation`] for a blank title or an end before the
    /// start, or [`StoreError::Database`] if the insert fails.
    pub fn insert_event(&mut self, new: NewEvent) -> Result<Event, StoreError> {
        if new.title.trim().is_empty() {
            return Err(StoreError::Validation(
                "event title must be non-empty".to_string(),
            ));
        }
        if new.end_date_time.is_some_and(|end| end < new.start_date_time) {
            return Err(StoreError::Validation(format!(
                "event '{}' ends before it starts",
                new.title
            )));
        }
        let venue_exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM locations WHERE id = ?1)",
            params![new.location_id.to_string()],
            |row| row.get(0),
        )?;
        if !venue_exists {
            return Err(StoreError::LocationNotFound(new.location_id));
        }

        let event = new.into_event(Uuid::new_v4(), Utc::now());
        insert_event_row(&self.conn, &event)?;

        tracing::info!(id = %event.id, title = %event.title, "event created");
        Ok(event)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn count_events(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Events passing `filter`, joined with their venue, soonest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn list_events(&self, filter: &EventFilter) -> Result<Vec<EventWithLocation>, StoreError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS}, {LOCATION_COLUMNS}
             FROM events e JOIN locations l ON l.id = e.location_id
             WHERE (?1 IS NULL OR e.event_type = ?1)
               AND (?2 IS NULL OR e.start_date_time >= ?2)
               AND (?3 IS NULL OR e.start_date_time <= ?3)
             ORDER BY e.start_date_time ASC, e.rowid ASC"
        );
        let (from, to) = filter.starts_between.unzip();
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let joined = stmt
            .query_map(
                params![filter.event_type.map(EventType::as_str), from, to],
                |row| {
                    Ok(EventWithLocation {
                        event: event_at(row)?,
                        location: location_at(row, EVENT_COLUMN_COUNT)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(joined)
    }

    /// Case-insensitive substring match on title, description or venue city.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn search_events_text(
        &self,
        query: &str,
        filter: &EventFilter,
    ) -> Result<Vec<EventWithLocation>, StoreError> {
        let needle = query.trim().to_lowercase();
        let mut events = self.list_events(filter)?;
        events.retain(|e| {
            contains_ci(&e.event.title, &needle)
                || contains_ci(&e.event.description, &needle)
                || contains_ci(&e.location.address.city, &needle)
        });
        Ok(events)
    }

    /// Events whose venue lies within `radius` of `center`, nearest first.
    /// Events at the same venue keep start-time order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn nearby_events(
        &self,
        center: Coordinates,
        radius: SearchRadius,
        filter: &EventFilter,
    ) -> Result<Vec<WithDistance<EventWithLocation>>, StoreError> {
        Ok(filter_by_proximity(
            self.list_events(filter)?,
            center.latitude(),
            center.longitude(),
            radius.miles(),
        ))
    }

    /// Same policy as [`Store::search_locations`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn search_events(
        &self,
        query: &str,
        center: Option<Coordinates>,
        radius: SearchRadius,
        filter: &EventFilter,
    ) -> Result<EventSearch, StoreError> {
        Ok(match center {
            Some(center) => EventSearch::Nearby {
                center,
                radius,
                items: self.nearby_events(center, radius, filter)?,
            },
            None => EventSearch::TextMatch {
                items: self.search_events_text(query, filter)?,
            },
        })
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
