use fitfindr_core::{Coordinates, Location};
use fitfindr_geo::{SearchRadius, WithDistance};
use serde::Serialize;

/// Which venues a bulk geocoding run should visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeocodeSelection {
    /// Only venues with no stored coordinates.
    #[default]
    MissingCoordinates,
    /// Every venue, overwriting existing coordinates.
    All,
}

/// Venue search results: ranked by distance when the query geocoded,
/// otherwise a plain text match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LocationSearch {
    Nearby {
        center: Coordinates,
        radius: SearchRadius,
        items: Vec<WithDistance<Location>>,
    },
    TextMatch {
        items: Vec<Location>,
    },
}

impl LocationSearch {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            LocationSearch::Nearby { items, .. } => items.len(),
            LocationSearch::TextMatch { items } => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
