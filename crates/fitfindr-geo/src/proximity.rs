//! Radius filtering and distance ranking.

use std::fmt;
use std::str::FromStr;

use fitfindr_core::{EventWithLocation, Location};
use serde::Serialize;

use crate::distance::distance_miles;
use crate::error::GeoError;

pub const DEFAULT_RADIUS_MILES: u32 = 25;

/// Anything that may sit at a point on the map.
pub trait Positioned {
    /// `(latitude, longitude)`, or `None` when not geocoded.
    fn position(&self) -> Option<(f64, f64)>;
}

impl Positioned for Location {
    fn position(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Events have no coordinates of their own; they sit at their venue.
impl Positioned for EventWithLocation {
    fn position(&self) -> Option<(f64, f64)> {
        self.location.position()
    }
}

impl<T: Positioned + ?Sized> Positioned for &T {
    fn position(&self) -> Option<(f64, f64)> {
        (**self).position()
    }
}

/// An item paired with its distance from the search center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithDistance<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(rename = "distance")]
    pub distance_miles: f64,
}

/// Keep the items within `radius_miles` of the center, nearest first.
///
/// Items without a position, or with a non-finite one, are dropped. The
/// radius is inclusive. Items at equal distance keep their input order.
#[must_use]
pub fn filter_by_proximity<T, I>(
    items: I,
    center_lat: f64,
    center_lon: f64,
    radius_miles: f64,
) -> Vec<WithDistance<T>>
where
    T: Positioned,
    I: IntoIterator<Item = T>,
{
    let mut within: Vec<WithDistance<T>> = items
        .into_iter()
        .filter_map(|item| {
            let (lat, lon) = item.position()?;
            if !lat.is_finite() || !lon.is_finite() {
                return None;
            }
            let distance = distance_miles(center_lat, center_lon, lat, lon);
            (distance <= radius_miles).then_some(WithDistance {
                item,
                distance_miles: distance,
            })
        })
        .collect();

    within.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    within
}

/// One of the fixed search radii offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u32")]
pub struct SearchRadius(u32);

impl SearchRadius {
    pub const ALLOWED: [u32; 5] = [5, 10, 25, 50, 100];

    #[must_use]
    pub fn miles(self) -> f64 {
        f64::from(self.0)
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self(DEFAULT_RADIUS_MILES)
    }
}

impl TryFrom<u32> for SearchRadius {
    type Error = GeoError;

    fn try_from(miles: u32) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&miles) {
            Ok(Self(miles))
        } else {
            Err(GeoError::InvalidRadius(miles))
        }
    }
}

impl From<SearchRadius> for u32 {
    fn from(radius: SearchRadius) -> Self {
        radius.0
    }
}

impl FromStr for SearchRadius {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let miles: u32 = s.trim().parse().map_err(|_| GeoError::InvalidRadius(0))?;
        Self::try_from(miles)
    }
}

impl fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mi", self.0)
    }
}
