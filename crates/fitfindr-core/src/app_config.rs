use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub store_path: PathBuf,
    pub seed_path: PathBuf,
    /// Optional YAML file replacing the built-in town-collision rules.
    pub disambiguation_path: Option<PathBuf>,
    pub geocoder_base_url: String,
    /// Sent as `User-Agent`; the provider rejects anonymous clients.
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub geocoder_cache_ttl_secs: u64,
    /// Most distinct queries the geocoder cache holds at once.
    pub geocoder_cache_capacity: NonZeroUsize,
    /// Pause between address formats for one location.
    pub geocode_attempt_delay_ms: u64,
    /// Pause between locations in a bulk run.
    pub geocode_entity_delay_ms: u64,
}
