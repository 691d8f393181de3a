use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use fitfindr_core::{Event, Location, SeedFile};
use uuid::Uuid;

use crate::events::insert_event_row;
use crate::locations::{insert_location_row, validate_new_location};
use crate::{Store, StoreError};

/// Counts of records written by [`Store::import_seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub locations: usize,
    pub events: usize,
}

impl Store {
    /// Replace the store's contents with `seed`.
    ///
    /// Event start times are resolved against `now`: `offset_days` from
    /// today at `start_hour` UTC.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if a location is invalid or an
    /// event names an unknown location, or [`StoreError::Database`] if the
    /// write fails. The previous contents survive any error.
    pub fn import_seed(
        &mut self,
        seed: &SeedFile,
        now: DateTime<Utc>,
    ) -> Result<SeedSummary, StoreError> {
        let mut locations: Vec<Location> = Vec::with_capacity(seed.locations.len());
        for (index, entry) in seed.locations.iter().enumerate() {
            validate_new_location(&entry.location)?;
            // Keep seed order visible in "newest first" listings.
            let created_at = now + Duration::seconds(i64::try_from(index).unwrap_or(0));
            locations.push(entry.location.clone().into_location(Uuid::new_v4(), created_at));
        }

        let today = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
        let mut events: Vec<Event> = Vec::with_capacity(seed.events.len());
        for seed_event in &seed.events {
            let location = locations
                .iter()
                .find(|l| l.name.eq_ignore_ascii_case(&seed_event.location_name))
                .ok_or_else(|| {
                    StoreError::Validation(format!(
                        "event '{}' references unknown location '{}'",
                        seed_event.title, seed_event.location_name
                    ))
                })?;

            let start = today
                + Duration::days(seed_event.offset_days)
                + Duration::hours(i64::from(seed_event.start_hour));
            events.push(Event {
                id: Uuid::new_v4(),
                title: seed_event.title.clone(),
                description: seed_event.description.clone(),
                event_type: seed_event.event_type,
                location_id: location.id,
                start_date_time: start,
                end_date_time: Some(start + Duration::minutes(seed_event.duration_minutes)),
                recurring_rule: seed_event.recurring_rule.clone(),
                created_at: now,
            });
        }

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM events", [])?;
        tx.execute("DELETE FROM locations", [])?;
        for location in &locations {
            insert_location_row(&tx, location)?;
        }
        for event in &events {
            insert_event_row(&tx, event)?;
        }
        tx.commit()?;

        let summary = SeedSummary {
            locations: locations.len(),
            events: events.len(),
        };
        tracing::info!(
            locations = summary.locations,
            events = summary.events,
            "seed imported"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;
    use fitfindr_core::{
        AddressRecord, EventFilter, EventType, LocationCategory, NewLocation, SeedEvent,
        SeedLocation,
    };

    use super::*;

    fn seed_location(name: &str, coords: Option<(f64, f64)>) -> SeedLocation {
        SeedLocation {
            location: NewLocation {
                name: name.to_string(),
                description: String::new(),
                category: LocationCategory::Track,
                address: AddressRecord {
                    city: "Austin".to_string(),
                    state: "TX".to_string(),
                    ..AddressRecord::default()
                },
                latitude: coords.map(|c| c.0),
                longitude: coords.map(|c| c.1),
                website_url: None,
                phone: None,
            },
        }
    }

    fn seed_event(location_name: &str) -> SeedEvent {
        SeedEvent {
            title: "Sunrise Track Session".to_string(),
            description: String::new(),
            event_type: EventType::Class,
            location_name: location_name.to_string(),
            offset_days: 2,
            start_hour: 6,
            duration_minutes: 90,
            recurring_rule: Some("weekly".to_string()),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 12, 15, 30, 0).unwrap()
    }

    #[test]
    fn import_replaces_contents_and_resolves_event_times() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("fitfindr.db")).unwrap();
        let seed = SeedFile {
            locations: vec![
                seed_location("Town Lake Track", Some((30.2622, -97.7534))),
                seed_location("Zilker Disc Golf", None),
            ],
            events: vec![seed_event("town lake track")],
        };

        let summary = store.import_seed(&seed, now()).unwrap();
        assert_eq!(summary, SeedSummary { locations: 2, events: 1 });

        let events = store.list_events(&EventFilter::default()).unwrap();
        let event = &events[0].event;
        assert_eq!(events[0].location.name, "Town Lake Track");
        assert_eq!(
            event.start_date_time,
            Utc.with_ymd_and_hms(2025, 3, 14, 6, 0, 0).unwrap()
        );
        assert_eq!(event.end_date_time.unwrap().minute(), 30);
        assert_eq!(event.recurring_rule.as_deref(), Some("weekly"));

        // Reimport replaces rather than appends.
        store.import_seed(&seed, now()).unwrap();
        assert_eq!(store.count_locations().unwrap(), 2);
        assert_eq!(store.count_events().unwrap(), 1);
    }

    #[test]
    fn newest_first_listing_shows_last_seeded_first() {
        let mut store = Store::open_in_memory().unwrap();
        let seed = SeedFile {
            locations: vec![seed_location("A", None), seed_location("B", None)],
            events: vec![],
        };
        store.import_seed(&seed, now()).unwrap();
        let names: Vec<_> = store
            .list_locations(None)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn unknown_event_location_keeps_previous_contents() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .import_seed(
                &SeedFile {
                    locations: vec![seed_location("Existing", None)],
                    events: vec![],
                },
                now(),
            )
            .unwrap();

        let seed = SeedFile {
            locations: vec![seed_location("Track", None)],
            events: vec![seed_event("Pool")],
        };
        assert!(matches!(
            store.import_seed(&seed, now()),
            Err(StoreError::Validation(_))
        ));
        let names: Vec<_> = store
            .list_locations(None)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Existing"]);
    }
}
