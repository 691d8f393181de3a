//! Venue operations.

mod read;
mod types;
mod write;

pub use types::{GeocodeSelection, LocationSearch};

pub(crate) use write::{insert_location_row, validate_new_location};

#[cfg(test)]
#[path = "locations_test.rs"]
mod tests;
