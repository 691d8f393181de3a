mod address;
mod app_config;
mod config;
mod coordinates;
mod disambiguation;
mod events;
mod locations;
mod seed;

use thiserror::Error;

pub use address::AddressRecord;
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use coordinates::{Coordinates, GeocodingResult};
pub use disambiguation::{default_disambiguation_rules, load_disambiguation_rules, RuleConfig};
pub use events::{DateWindow, Event, EventFilter, EventType, EventWithLocation, NewEvent};
pub use locations::{Location, LocationCategory, NewLocation};
pub use seed::{load_seed, SeedEvent, SeedFile, SeedLocation};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    FileParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("unknown location category: {0}")]
    UnknownCategory(String),

    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    #[error("unknown date window: {0}")]
    UnknownDateWindow(String),
}
