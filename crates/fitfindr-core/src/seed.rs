use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::{ConfigError, Coordinates, EventType, NewLocation};

/// A seeded venue. Coordinates may be omitted and filled in later by a
/// geocoding run.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedLocation {
    #[serde(flatten)]
    pub location: NewLocation,
}

/// A seeded event. Start time is relative to the moment of import so demo
/// data never goes stale.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_type: EventType,
    /// Name of the seeded location hosting the event.
    pub location_name: String,
    pub offset_days: i64,
    pub start_hour: u32,
    pub duration_minutes: i64,
    #[serde(default)]
    pub recurring_rule: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    pub locations: Vec<SeedLocation>,
    #[serde(default)]
    pub events: Vec<SeedEvent>,
}

/// Load and validate the seed data from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed(path: &Path) -> Result<SeedFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let seed: SeedFile = serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
        path: path.display().to_string(),
        source: e,
    })?;

    validate_seed(&seed)?;

    Ok(seed)
}

fn validate_seed(seed: &SeedFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for entry in &seed.locations {
        let location = &entry.location;
        if location.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "location name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(location.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate location name: '{}'",
                location.name
            )));
        }

        match (location.latitude, location.longitude) {
            (Some(lat), Some(lon)) => {
                Coordinates::new(lat, lon).map_err(|e| {
                    ConfigError::Validation(format!("location '{}': {e}", location.name))
                })?;
            }
            (None, None) => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "location '{}' must set both latitude and longitude or neither",
                    location.name
                )));
            }
        }
    }

    for event in &seed.events {
        if event.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "event title must be non-empty".to_string(),
            ));
        }
        if !seen_names.contains(&event.location_name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "event '{}' references unknown location '{}'",
                event.title, event.location_name
            )));
        }
        if event.start_hour > 23 {
            return Err(ConfigError::Validation(format!(
                "event '{}' has invalid start_hour {}; must be 0-23",
                event.title, event.start_hour
            )));
        }
        if event.duration_minutes <= 0 {
            return Err(ConfigError::Validation(format!(
                "event '{}' must have a positive duration",
                event.title
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;
