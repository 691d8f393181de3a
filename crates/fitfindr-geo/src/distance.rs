//! Great-circle distance.

use std::f64::consts::PI;

/// Mean Earth radius used for all proximity ranking.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Haversine distance in miles between two lat/lon points given in degrees.
///
/// Non-finite inputs yield `NaN`; callers filter those out beforehand.
#[must_use]
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let to_rad = |deg: f64| deg * PI / 180.0;

    let dlat = to_rad(lat2 - lat1);
    let dlon = to_rad(lon2 - lon1);

    let a = (dlat / 2.0).sin().powi(2)
        + to_rad(lat1).cos() * to_rad(lat2).cos() * (dlon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUSTIN: (f64, f64) = (30.267_2, -97.743_1);
    const DALLAS: (f64, f64) = (32.776_7, -96.797_0);

    #[test]
    fn same_point_is_zero() {
        for (lat, lon) in [AUSTIN, DALLAS, (0.0, 0.0), (89.9, 179.9), (-45.0, -120.0)] {
            assert!(distance_miles(lat, lon, lat, lon).abs() < 1e-9);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let there = distance_miles(AUSTIN.0, AUSTIN.1, DALLAS.0, DALLAS.1);
        let back = distance_miles(DALLAS.0, DALLAS.1, AUSTIN.0, AUSTIN.1);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn austin_to_dallas_is_about_182_miles() {
        let d = distance_miles(AUSTIN.0, AUSTIN.1, DALLAS.0, DALLAS.1);
        assert!((d - 182.0).abs() < 3.0, "expected ~182 miles, got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_69_miles() {
        let d = distance_miles(30.0, -97.0, 31.0, -97.0);
        assert!((d - 69.1).abs() < 0.2, "got {d}");
    }

    #[test]
    fn non_finite_input_propagates_nan() {
        assert!(distance_miles(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }
}
