use thiserror::Error;

/// Errors from the geocoding provider and geo configuration.
///
/// None of these escape [`crate::Geocoder::geocode_address`]: at that
/// boundary every provider error collapses to "not found" and is only logged.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into candidates.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid geocoder base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid disambiguation rule: {0}")]
    InvalidRule(String),

    #[error("unsupported search radius {0} mi; expected one of 5, 10, 25, 50, 100")]
    InvalidRadius(u32),
}

impl GeoError {
    /// `true` for failures of the network call itself rather than of its payload.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, GeoError::Http(_) | GeoError::UnexpectedStatus { .. })
    }
}
