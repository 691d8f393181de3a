//! Multi-format address resolution for stored venues.
//!
//! A venue's address is tried as several query strings, most specific first,
//! until one geocodes. Bulk runs walk venues strictly one at a time with a
//! pause between them; the provider's usage policy forbids anything faster.
//!
//! Nothing here locks individual venues. Callers must not resolve the same
//! venue from two places at once.

mod batch;
mod formats;

use fitfindr_core::{AddressRecord, AppConfig, Coordinates};
use serde::Serialize;
use thiserror::Error;

use crate::client::Geocoder;
use crate::pacing::Pacing;
use crate::provider::GeocodingProvider;

pub use batch::{BatchEntry, BatchReport, CoordinateSink, GeocodeTarget};
pub use formats::AddressFormat;

/// Why an address could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    #[error("address has no usable components")]
    NoUsableAddress,

    #[error("no match for any of {attempts} address formats")]
    AllFormatsExhausted { attempts: usize },
}

/// Result of resolving one address. Failure is an ordinary value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeocodeOutcome {
    Success {
        coordinates: Coordinates,
        display_name: String,
        /// The exact query string that matched.
        address_used: String,
    },
    Failure { reason: FailureReason },
}

impl GeocodeOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, GeocodeOutcome::Success { .. })
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            GeocodeOutcome::Success { coordinates, .. } => Some(*coordinates),
            GeocodeOutcome::Failure { .. } => None,
        }
    }
}

/// Which formats to try, and how long to wait between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvePolicy {
    pub formats: Vec<AddressFormat>,
    pub pacing: Pacing,
}

impl ResolvePolicy {
    /// Default formats with the delays from config. Config loading has
    /// already enforced the minimum delays.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            formats: AddressFormat::ALL.to_vec(),
            pacing: Pacing::from_millis(
                config.geocode_attempt_delay_ms,
                config.geocode_entity_delay_ms,
            ),
        }
    }

    /// Non-blank query strings for `address`, in policy order.
    #[must_use]
    pub fn candidate_queries(&self, address: &AddressRecord) -> Vec<String> {
        self.formats
            .iter()
            .map(|format| format.render(address))
            .filter(|query| !query.is_empty())
            .collect()
    }
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self {
            formats: AddressFormat::ALL.to_vec(),
            pacing: Pacing::default(),
        }
    }
}

/// Resolves stored addresses through a borrowed [`Geocoder`].
pub struct Resolver<'g, P> {
    geocoder: &'g Geocoder<P>,
    policy: ResolvePolicy,
}

impl<'g, P: GeocodingProvider> Resolver<'g, P> {
    #[must_use]
    pub fn new(geocoder: &'g Geocoder<P>, policy: ResolvePolicy) -> Self {
        Self { geocoder, policy }
    }

    #[must_use]
    pub fn policy(&self) -> &ResolvePolicy {
        &self.policy
    }

    /// Try each candidate query in turn until one matches.
    ///
    /// Waits `pacing.between_attempts` after each miss that has another
    /// attempt behind it.
    pub async fn resolve_one(&self, address: &AddressRecord) -> GeocodeOutcome {
        let queries = self.policy.candidate_queries(address);
        if queries.is_empty() {
            return GeocodeOutcome::Failure {
                reason: FailureReason::NoUsableAddress,
            };
        }

        let attempts = queries.len();
        for (index, query) in queries.into_iter().enumerate() {
            if index > 0 {
                self.policy.pacing.after_attempt().await;
            }
            if let Some(result) = self.geocoder.geocode_address(&query).await {
                tracing::debug!(attempt = index + 1, address = %query, "address resolved");
                return GeocodeOutcome::Success {
                    coordinates: result.coordinates,
                    display_name: result.display_name,
                    address_used: query,
                };
            }
            tracing::debug!(attempt = index + 1, address = %query, "no match for address format");
        }

        GeocodeOutcome::Failure {
            reason: FailureReason::AllFormatsExhausted { attempts },
        }
    }

    /// Resolve each address in order, pausing between consecutive addresses
    /// whatever their outcome.
    pub async fn resolve_many(&self, addresses: &[AddressRecord]) -> Vec<GeocodeOutcome> {
        let mut outcomes = Vec::with_capacity(addresses.len());
        self.resolve_paced(addresses, |address| address, |_, outcome| {
            outcomes.push(outcome);
        })
        .await;
        outcomes
    }

    /// Walk `items` one at a time, waiting `pacing.between_entities` before
    /// every item but the first, and hand each outcome to `on_outcome`.
    async fn resolve_paced<T, F>(
        &self,
        items: &[T],
        address_of: fn(&T) -> &AddressRecord,
        mut on_outcome: F,
    ) where
        F: FnMut(&T, GeocodeOutcome),
    {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.policy.pacing.after_entity().await;
            }
            let outcome = self.resolve_one(address_of(item)).await;
            on_outcome(item, outcome);
        }
    }
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
