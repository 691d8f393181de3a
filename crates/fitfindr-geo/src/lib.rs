//! Address geocoding and proximity search for FitFindr venues.
//!
//! The pieces, leaves first:
//!
//! - [`distance`]: haversine distance in miles.
//! - [`normalize`]: street-abbreviation expansion and town-collision rules.
//! - [`provider`] / [`cache`]: the external geocoding capability and its
//!   TTL cache.
//! - [`client`]: [`Geocoder`], turning a free-text query into one best match.
//! - [`proximity`]: radius filtering and distance sorting.
//! - [`resolve`]: multi-format address resolution for stored venues,
//!   single and bulk, paced for the provider's usage policy.

pub mod cache;
pub mod client;
pub mod distance;
pub mod error;
pub mod normalize;
pub mod pacing;
pub mod provider;
pub mod proximity;
pub mod resolve;

#[cfg(test)]
mod fake;

use std::time::Duration;

use fitfindr_core::AppConfig;

pub use cache::CachedProvider;
pub use client::Geocoder;
pub use distance::distance_miles;
pub use error::GeoError;
pub use normalize::{normalize_address, DisambiguationRule, DisambiguationRules};
pub use pacing::Pacing;
pub use provider::{Candidate, GeocodingProvider, NominatimProvider};
pub use proximity::{filter_by_proximity, Positioned, SearchRadius, WithDistance, DEFAULT_RADIUS_MILES};
pub use resolve::{
    AddressFormat, BatchEntry, BatchReport, CoordinateSink, FailureReason, GeocodeOutcome,
    GeocodeTarget, ResolvePolicy, Resolver,
};

/// The production geocoder: Nominatim behind a response cache.
pub type NominatimGeocoder = Geocoder<CachedProvider<NominatimProvider>>;

/// Build the production geocoder from application config.
///
/// Uses the rules file at `config.disambiguation_path` when set, otherwise
/// the built-in rules.
///
/// # Errors
///
/// Returns [`GeoError`] if the HTTP client cannot be built, the base URL is
/// invalid, or the rules file cannot be loaded or compiled.
pub fn build_geocoder(config: &AppConfig) -> Result<NominatimGeocoder, GeoError> {
    let provider = NominatimProvider::with_base_url(
        &config.geocoder_base_url,
        &config.geocoder_user_agent,
        config.geocoder_timeout_secs,
    )?;
    let cached = CachedProvider::new(
        provider,
        Duration::from_secs(config.geocoder_cache_ttl_secs),
        config.geocoder_cache_capacity,
    );

    let rule_configs = match &config.disambiguation_path {
        Some(path) => fitfindr_core::load_disambiguation_rules(path)
            .map_err(|e| GeoError::InvalidRule(e.to_string()))?,
        None => fitfindr_core::default_disambiguation_rules(),
    };
    let rules = DisambiguationRules::from_configs(&rule_configs)?;

    tracing::debug!(
        base_url = %config.geocoder_base_url,
        rules = rules.len(),
        "geocoder ready"
    );
    Ok(Geocoder::with_rules(cached, rules))
}
