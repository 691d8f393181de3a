use chrono::Utc;
use fitfindr_core::{Coordinates, Location, NewLocation};
use fitfindr_geo::CoordinateSink;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::{Store, StoreError};

pub(crate) fn validate_new_location(location: &NewLocation) -> Result<(), StoreError> {
    if location.name.trim().is_empty() {
        return Err(StoreError::Validation(
            "location name must be non-empty".to_string(),
        ));
    }
    match (location.latitude, location.longitude) {
        (Some(lat), Some(lon)) => {
            Coordinates::new(lat, lon).map_err(|e| StoreError::Validation(e.to_string()))?;
        }
        (None, None) => {}
        _ => {
            return Err(StoreError::Validation(format!(
                "location '{}' must set both latitude and longitude or neither",
                location.name
            )))
        }
    }
    Ok(())
}

pub(crate) fn insert_location_row(conn: &Connection, location: &Location) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO locations (id, name, description, category,
             address_line1, address_line2, city, state, postal_code, country,
             latitude, longitude, website_url, phone, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            location.id.to_string(),
            location.name,
            location.description,
            location.category.as_str(),
            location.address.line1,
            location.address.line2,
            location.address.city,
            location.address.state,
            location.address.postal_code,
            location.address.country,
            location.latitude,
            location.longitude,
            location.website_url,
            location.phone,
            location.created_at,
        ],
    )?;
    Ok(())
}

impl Store {
    /// Insert a venue and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a blank name or half-set or
    /// out-of-range coordinates, or [`StoreError::Database`] if the insert
    /// fails.
    pub fn insert_location(&mut self, new: NewLocation) -> Result<Location, StoreError> {
        validate_new_location(&new)?;

        let location = new.into_location(Uuid::new_v4(), Utc::now());
        insert_location_row(&self.conn, &location)?;

        tracing::info!(id = %location.id, name = %location.name, "location created");
        Ok(location)
    }

    /// Overwrite a venue's coordinates. No other field is touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LocationNotFound`] for an unknown id, or
    /// [`StoreError::Database`] if the update fails.
    pub fn update_coordinates(
        &mut self,
        id: Uuid,
        coordinates: Coordinates,
    ) -> Result<(), StoreError> {
        let updated = self.conn.execute(
            "UPDATE locations SET latitude = ?1, longitude = ?2 WHERE id = ?3",
            params![
                coordinates.latitude(),
                coordinates.longitude(),
                id.to_string()
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::LocationNotFound(id));
        }

        tracing::debug!(%id, %coordinates, "coordinates updated");
        Ok(())
    }
}

impl CoordinateSink for Store {
    type Error = StoreError;

    fn save_coordinates(&mut self, id: Uuid, coordinates: Coordinates) -> Result<(), StoreError> {
        self.update_coordinates(id, coordinates)
    }
}
