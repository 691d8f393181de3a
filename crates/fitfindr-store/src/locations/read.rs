use fitfindr_core::{Coordinates, Location, LocationCategory};
use fitfindr_geo::{filter_by_proximity, GeocodeTarget, SearchRadius, WithDistance};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::types::{GeocodeSelection, LocationSearch};
use crate::rows::{location_at, LOCATION_COLUMNS};
use crate::{contains_ci, Store, StoreError};

impl Store {
    /// All venues, optionally of one category, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn list_locations(
        &self,
        category: Option<LocationCategory>,
    ) -> Result<Vec<Location>, StoreError> {
        let sql = format!(
            "SELECT {LOCATION_COLUMNS} FROM locations l
             WHERE (?1 IS NULL OR l.category = ?1)
             ORDER BY l.created_at DESC, l.rowid DESC"
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let locations = stmt
            .query_map(params![category.map(LocationCategory::as_str)], |row| {
                location_at(row, 0)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(locations)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn get_location(&self, id: Uuid) -> Result<Option<Location>, StoreError> {
        let sql = format!("SELECT {LOCATION_COLUMNS} FROM locations l WHERE l.id = ?1");
        let location = self
            .conn
            .query_row(&sql, params![id.to_string()], |row| location_at(row, 0))
            .optional()?;
        Ok(location)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn count_locations(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Case-insensitive substring match on name, city or state, newest first.
    /// A blank query matches every venue.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn search_locations_text(
        &self,
        query: &str,
        category: Option<LocationCategory>,
    ) -> Result<Vec<Location>, StoreError> {
        let needle = query.trim().to_lowercase();
        let mut locations = self.list_locations(category)?;
        locations.retain(|l| {
            contains_ci(&l.name, &needle)
                || contains_ci(&l.address.city, &needle)
                || contains_ci(&l.address.state, &needle)
        });
        Ok(locations)
    }

    /// Geocoded venues within `radius` of `center`, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn nearby_locations(
        &self,
        center: Coordinates,
        radius: SearchRadius,
        category: Option<LocationCategory>,
    ) -> Result<Vec<WithDistance<Location>>, StoreError> {
        let sql = format!(
            "SELECT {LOCATION_COLUMNS} FROM locations l
             WHERE l.latitude IS NOT NULL AND l.longitude IS NOT NULL
               AND (?1 IS NULL OR l.category = ?1)
             ORDER BY l.created_at DESC, l.rowid DESC"
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let candidates = stmt
            .query_map(params![category.map(LocationCategory::as_str)], |row| {
                location_at(row, 0)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(filter_by_proximity(
            candidates,
            center.latitude(),
            center.longitude(),
            radius.miles(),
        ))
    }

    /// Rank by distance when the caller geocoded the query to `center`,
    /// otherwise fall back to a text match on `query`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn search_locations(
        &self,
        query: &str,
        center: Option<Coordinates>,
        radius: SearchRadius,
        category: Option<LocationCategory>,
    ) -> Result<LocationSearch, StoreError> {
        Ok(match center {
            Some(center) => LocationSearch::Nearby {
                center,
                radius,
                items: self.nearby_locations(center, radius, category)?,
            },
            None => LocationSearch::TextMatch {
                items: self.search_locations_text(query, category)?,
            },
        })
    }

    /// Venues to visit in a bulk geocoding run, oldest first so reruns walk
    /// the same order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    pub fn geocode_targets(
        &self,
        selection: GeocodeSelection,
    ) -> Result<Vec<GeocodeTarget>, StoreError> {
        let only_missing = selection == GeocodeSelection::MissingCoordinates;
        let sql = format!(
            "SELECT {LOCATION_COLUMNS} FROM locations l
             WHERE ?1 = 0 OR l.latitude IS NULL OR l.longitude IS NULL
             ORDER BY l.created_at ASC, l.rowid ASC"
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let targets = stmt
            .query_map(params![only_missing], |row| {
                location_at(row, 0).map(|l| GeocodeTarget::from(&l))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(targets)
    }
}
