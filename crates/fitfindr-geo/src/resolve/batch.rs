use std::fmt::Display;

use fitfindr_core::{AddressRecord, Coordinates, Location};
use serde::Serialize;
use uuid::Uuid;

use super::{GeocodeOutcome, Resolver};
use crate::provider::GeocodingProvider;

/// Where resolved coordinates are written.
///
/// The resolver calls this at most once per target, and only on success.
pub trait CoordinateSink {
    type Error: Display;

    /// # Errors
    ///
    /// Implementation-defined; the batch records the message and moves on.
    fn save_coordinates(&mut self, id: Uuid, coordinates: Coordinates) -> Result<(), Self::Error>;
}

/// A stored venue selected for geocoding.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeTarget {
    pub id: Uuid,
    pub name: String,
    pub address: AddressRecord,
}

impl From<&Location> for GeocodeTarget {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id,
            name: location.name.clone(),
            address: location.address.clone(),
        }
    }
}

/// Per-venue row of a bulk run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub id: Uuid,
    pub name: String,
    pub outcome: GeocodeOutcome,
    /// Set when the coordinates resolved but could not be saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
}

impl BatchEntry {
    /// Resolved and saved.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_success() && self.persist_error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Entries that resolved and were saved.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.is_success()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

impl<P: GeocodingProvider> Resolver<'_, P> {
    /// Resolve every target in order and save each success through `sink`.
    ///
    /// A save failure is recorded on that target's entry; the run continues.
    pub async fn run_batch<S>(&self, targets: &[GeocodeTarget], sink: &mut S) -> BatchReport
    where
        S: CoordinateSink + Send,
    {
        let mut entries = Vec::with_capacity(targets.len());
        self.resolve_paced(targets, |target| &target.address, |target, outcome| {
            let persist_error = match &outcome {
                GeocodeOutcome::Success {
                    coordinates,
                    address_used,
                    ..
                } => {
                    tracing::info!(
                        id = %target.id,
                        name = %target.name,
                        address = %address_used,
                        "geocoded location"
                    );
                    sink.save_coordinates(target.id, *coordinates)
                        .err()
                        .map(|e| {
                            tracing::error!(id = %target.id, error = %e, "failed to save coordinates");
                            e.to_string()
                        })
                }
                GeocodeOutcome::Failure { reason } => {
                    tracing::warn!(
                        id = %target.id,
                        name = %target.name,
                        reason = %reason,
                        "could not geocode location"
                    );
                    None
                }
            };

            entries.push(BatchEntry {
                id: target.id,
                name: target.name.clone(),
                outcome,
                persist_error,
            });
        })
        .await;

        let report = BatchReport { entries };
        tracing::info!(
            total = report.total(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            "geocoding batch complete"
        );
        report
    }
}
