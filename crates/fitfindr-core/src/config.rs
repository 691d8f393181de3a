use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Provider usage policy floor for the pause between address formats.
pub(crate) const MIN_ATTEMPT_DELAY_MS: u64 = 500;
/// Provider usage policy floor for the pause between locations in a bulk run.
pub(crate) const MIN_ENTITY_DELAY_MS: u64 = 1_000;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::num::NonZeroUsize;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let at_least = |var: &str, value: u64, floor: u64| -> Result<u64, ConfigError> {
        if value < floor {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be at least {floor}"),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("FITFINDR_ENV", "development"))?;

    let bind_addr = parse_addr("FITFINDR_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("FITFINDR_LOG_LEVEL", "info");
    let store_path = PathBuf::from(or_default("FITFINDR_STORE_PATH", "./data/fitfindr.db"));
    let seed_path = PathBuf::from(or_default("FITFINDR_SEED_PATH", "./config/seed.yaml"));
    let disambiguation_path = lookup("FITFINDR_DISAMBIGUATION_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let geocoder_base_url = or_default(
        "FITFINDR_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let geocoder_user_agent = or_default("FITFINDR_GEOCODER_USER_AGENT", "FitFindr/1.0");
    if geocoder_user_agent.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "FITFINDR_GEOCODER_USER_AGENT".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    let geocoder_timeout_secs = parse_u64("FITFINDR_GEOCODER_TIMEOUT_SECS", "10")?;
    let geocoder_cache_ttl_secs = parse_u64("FITFINDR_GEOCODER_CACHE_TTL_SECS", "3600")?;
    let geocoder_cache_capacity = or_default("FITFINDR_GEOCODER_CACHE_CAPACITY", "1000")
        .parse::<NonZeroUsize>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "FITFINDR_GEOCODER_CACHE_CAPACITY".to_string(),
            reason: e.to_string(),
        })?;

    let geocode_attempt_delay_ms = at_least(
        "FITFINDR_GEOCODE_ATTEMPT_DELAY_MS",
        parse_u64("FITFINDR_GEOCODE_ATTEMPT_DELAY_MS", "500")?,
        MIN_ATTEMPT_DELAY_MS,
    )?;
    let geocode_entity_delay_ms = at_least(
        "FITFINDR_GEOCODE_ENTITY_DELAY_MS",
        parse_u64("FITFINDR_GEOCODE_ENTITY_DELAY_MS", "1000")?,
        MIN_ENTITY_DELAY_MS,
    )?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        store_path,
        seed_path,
        disambiguation_path,
        geocoder_base_url,
        geocoder_user_agent,
        geocoder_timeout_secs,
        geocoder_cache_ttl_secs,
        geocoder_cache_capacity,
        geocode_attempt_delay_ms,
        geocode_entity_delay_ms,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FITFINDR_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
