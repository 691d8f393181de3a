//! The external geocoding capability and its Nominatim implementation.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Deserializer};

use crate::error::GeoError;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const CANDIDATE_LIMIT: &str = "5";
const COUNTRY_CODES: &str = "us";

/// One match returned by a geocoding provider, in provider order.
///
/// Coordinates stay as the provider's strings until the best candidate has
/// been chosen; only that one is parsed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Candidate {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub importance: Option<f64>,
}

impl Candidate {
    /// Convenience constructor used by fakes and tests.
    #[must_use]
    pub fn new(lat: &str, lon: &str, display_name: &str, importance: Option<f64>) -> Self {
        Self {
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: display_name.to_string(),
            importance,
        }
    }
}

/// Accepts `0.62`, `"0.62"`, or `null`. Anything unparsable becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(f64),
        Str(String),
    }

    Ok(
        match Option::<NumOrString>::deserialize(deserializer)? {
            Some(NumOrString::Num(n)) => Some(n),
            Some(NumOrString::Str(s)) => s.trim().parse().ok(),
            None => None,
        },
    )
}

/// Free-text search against some geocoding backend.
///
/// Implementations return candidates in the provider's own ranking order and
/// surface transport and payload failures as [`GeoError`].
pub trait GeocodingProvider: Send + Sync {
    fn search(&self, query: &str)
        -> impl Future<Output = Result<Vec<Candidate>, GeoError>> + Send;
}

/// Client for the public Nominatim search API.
///
/// Use [`NominatimProvider::new`] for production or
/// [`NominatimProvider::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct NominatimProvider {
    client: Client,
    base_url: Url,
}

impl NominatimProvider {
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, GeoError> {
        Self::with_base_url(DEFAULT_BASE_URL, user_agent, timeout_secs)
    }

    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeoError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        user_agent: &str,
        timeout_secs: u64,
    ) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join("search")` appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GeoError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self { client, base_url })
    }

    fn search_url(&self, query: &str) -> Result<Url, GeoError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| GeoError::InvalidBaseUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", CANDIDATE_LIMIT)
            .append_pair("addressdetails", "1")
            .append_pair("countrycodes", COUNTRY_CODES);
        Ok(url)
    }
}

impl GeocodingProvider for NominatimProvider {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, GeoError> {
        let url = self.search_url(query)?;
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeoError::Deserialize {
            context: format!("search(q={query})"),
            source: e,
        })
    }
}
