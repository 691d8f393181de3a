//! Free-text geocoding: one query in, at most one best match out.

use fitfindr_core::{Coordinates, GeocodingResult};

use crate::normalize::{normalize_address, DisambiguationRules};
use crate::provider::{Candidate, GeocodingProvider};

/// Turns a free-text address into its single best match.
///
/// Wraps a [`GeocodingProvider`] with abbreviation normalization, town
/// disambiguation and candidate ranking. Failures never escape: a blank
/// query, a provider error, no candidates or an unusable best candidate all
/// yield `None`, and only the last two kinds are logged.
#[derive(Debug)]
pub struct Geocoder<P> {
    provider: P,
    rules: DisambiguationRules,
}

impl<P: GeocodingProvider> Geocoder<P> {
    /// Geocoder with the built-in disambiguation rules.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_rules(provider, DisambiguationRules::default())
    }

    #[must_use]
    pub fn with_rules(provider: P, rules: DisambiguationRules) -> Self {
        Self { provider, rules }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn rules(&self) -> &DisambiguationRules {
        &self.rules
    }

    /// Geocode `query`, returning the best-ranked candidate.
    pub async fn geocode_address(&self, query: &str) -> Option<GeocodingResult> {
        if query.trim().is_empty() {
            return None;
        }

        let normalized = normalize_address(query);
        let triggered = self.rules.triggered(&normalized);

        let candidates = match self.provider.search(&normalized).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(query = %normalized, error = %e, "geocoding request failed");
                return None;
            }
        };
        if candidates.is_empty() {
            tracing::debug!(query = %normalized, "no geocoding candidates");
            return None;
        }

        let filtered: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| triggered.iter().all(|rule| rule.accepts(&c.display_name)))
            .collect();
        let pool: Vec<&Candidate> = if filtered.is_empty() {
            if !triggered.is_empty() {
                tracing::debug!(
                    query = %normalized,
                    "disambiguation removed every candidate; using unfiltered list"
                );
            }
            candidates.iter().collect()
        } else {
            filtered
        };

        let best = best_candidate(&pool)?;
        match parse_candidate(best) {
            Some(coordinates) => Some(GeocodingResult {
                coordinates,
                display_name: best.display_name.clone(),
            }),
            None => {
                tracing::error!(
                    query = %normalized,
                    lat = %best.lat,
                    lon = %best.lon,
                    "provider returned unusable coordinates"
                );
                None
            }
        }
    }
}

/// Highest importance wins; missing importance counts as zero. The first
/// candidate in provider order wins ties.
fn best_candidate<'a>(pool: &[&'a Candidate]) -> Option<&'a Candidate> {
    let mut best: Option<&'a Candidate> = None;
    for candidate in pool {
        let better = match best {
            None => true,
            Some(current) => importance(candidate) > importance(current),
        };
        if better {
            best = Some(candidate);
        }
    }
    best
}

fn importance(candidate: &Candidate) -> f64 {
    candidate
        .importance
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn parse_candidate(candidate: &Candidate) -> Option<Coordinates> {
    let lat: f64 = candidate.lat.trim().parse().ok()?;
    let lon: f64 = candidate.lon.trim().parse().ok()?;
    Coordinates::new(lat, lon).ok()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
