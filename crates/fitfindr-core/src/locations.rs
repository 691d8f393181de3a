use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AddressRecord, Coordinates, CoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationCategory {
    Gym,
    YogaStudio,
    Track,
    DiscGolf,
    Other,
}

impl LocationCategory {
    pub const ALL: [LocationCategory; 5] = [
        LocationCategory::Gym,
        LocationCategory::YogaStudio,
        LocationCategory::Track,
        LocationCategory::DiscGolf,
        LocationCategory::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LocationCategory::Gym => "gym",
            LocationCategory::YogaStudio => "yoga_studio",
            LocationCategory::Track => "track",
            LocationCategory::DiscGolf => "disc_golf",
            LocationCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for LocationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LocationCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

/// A venue in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: LocationCategory,
    #[serde(flatten)]
    pub address: AddressRecord,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Location {
    /// Stored coordinates, if both halves are present and in range.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Input for creating a location. Coordinates are optional; when absent the
/// caller may geocode the address before inserting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLocation {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: LocationCategory,
    #[serde(flatten)]
    pub address: AddressRecord,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl NewLocation {
    #[must_use]
    pub fn into_location(self, id: Uuid, created_at: DateTime<Utc>) -> Location {
        Location {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            website_url: self.website_url.filter(|u| !u.trim().is_empty()),
            phone: self.phone.filter(|p| !p.trim().is_empty()),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for category in LocationCategory::ALL {
            assert_eq!(category.as_str().parse::<LocationCategory>(), Ok(category));
        }
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(
            "YOGA_STUDIO".parse::<LocationCategory>(),
            Ok(LocationCategory::YogaStudio)
        );
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert_eq!(
            "spa".parse::<LocationCategory>(),
            Err(CoreError::UnknownCategory("spa".to_string()))
        );
    }

    #[test]
    fn coordinates_require_both_halves() {
        let mut location = NewLocation {
            name: "Town Lake Track".to_string(),
            description: String::new(),
            category: LocationCategory::Track,
            address: AddressRecord::default(),
            latitude: Some(30.2605),
            longitude: None,
            website_url: Some(String::new()),
            phone: None,
        }
        .into_location(Uuid::new_v4(), Utc::now());
        assert!(location.coordinates().is_none());
        assert!(!location.has_coordinates());
        assert!(location.website_url.is_none());

        location.longitude = Some(-97.752);
        assert!(location.coordinates().is_some());
    }
}
