use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "FITFINDR_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.store_path.to_str(), Some("./data/fitfindr.db"));
    assert_eq!(cfg.seed_path.to_str(), Some("./config/seed.yaml"));
    assert!(cfg.disambiguation_path.is_none());
    assert_eq!(cfg.geocoder_base_url, "https://nominatim.openstreetmap.org");
    assert_eq!(cfg.geocoder_user_agent, "FitFindr/1.0");
    assert_eq!(cfg.geocoder_timeout_secs, 10);
    assert_eq!(cfg.geocoder_cache_ttl_secs, 3600);
    assert_eq!(cfg.geocoder_cache_capacity.get(), 1000);
    assert_eq!(cfg.geocode_attempt_delay_ms, 500);
    assert_eq!(cfg.geocode_entity_delay_ms, 1000);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("FITFINDR_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FITFINDR_BIND_ADDR"),
        "expected InvalidEnvVar(FITFINDR_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn geocoder_overrides_are_applied() {
    let mut map = HashMap::new();
    map.insert("FITFINDR_GEOCODER_BASE_URL", "http://localhost:8080");
    map.insert("FITFINDR_GEOCODER_USER_AGENT", "fitfindr-test/0.1");
    map.insert("FITFINDR_GEOCODER_TIMEOUT_SECS", "3");
    map.insert("FITFINDR_GEOCODER_CACHE_TTL_SECS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.geocoder_base_url, "http://localhost:8080");
    assert_eq!(cfg.geocoder_user_agent, "fitfindr-test/0.1");
    assert_eq!(cfg.geocoder_timeout_secs, 3);
    assert_eq!(cfg.geocoder_cache_ttl_secs, 0);
}

#[test]
fn cache_capacity_must_be_positive() {
    let mut map = HashMap::new();
    map.insert("FITFINDR_GEOCODER_CACHE_CAPACITY", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FITFINDR_GEOCODER_CACHE_CAPACITY"),
        "got: {result:?}"
    );

    map.insert("FITFINDR_GEOCODER_CACHE_CAPACITY", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.geocoder_cache_capacity.get(), 250);
}

#[test]
fn empty_user_agent_is_rejected() {
    let mut map = HashMap::new();
    map.insert("FITFINDR_GEOCODER_USER_AGENT", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FITFINDR_GEOCODER_USER_AGENT"),
        "got: {result:?}"
    );
}

#[test]
fn timeout_must_be_numeric() {
    let mut map = HashMap::new();
    map.insert("FITFINDR_GEOCODER_TIMEOUT_SECS", "ten");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FITFINDR_GEOCODER_TIMEOUT_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn attempt_delay_below_floor_is_rejected() {
    let mut map = HashMap::new();
    map.insert("FITFINDR_GEOCODE_ATTEMPT_DELAY_MS", "100");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FITFINDR_GEOCODE_ATTEMPT_DELAY_MS"),
        "got: {result:?}"
    );
}

#[test]
fn entity_delay_below_floor_is_rejected() {
    let mut map = HashMap::new();
    map.insert("FITFINDR_GEOCODE_ENTITY_DELAY_MS", "999");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FITFINDR_GEOCODE_ENTITY_DELAY_MS"),
        "got: {result:?}"
    );
}

#[test]
fn delays_above_floor_are_accepted() {
    let mut map = HashMap::new();
    map.insert("FITFINDR_GEOCODE_ATTEMPT_DELAY_MS", "750");
    map.insert("FITFINDR_GEOCODE_ENTITY_DELAY_MS", "2000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.geocode_attempt_delay_ms, 750);
    assert_eq!(cfg.geocode_entity_delay_ms, 2000);
}

#[test]
fn blank_disambiguation_path_is_ignored() {
    let mut map = HashMap::new();
    map.insert("FITFINDR_DISAMBIGUATION_PATH", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.disambiguation_path.is_none());

    map.insert("FITFINDR_DISAMBIGUATION_PATH", "./config/towns.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.disambiguation_path.as_deref().and_then(|p| p.to_str()),
        Some("./config/towns.yaml")
    );
}

#[test]
fn debug_output_lists_fields() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(rendered.contains("geocoder_user_agent"));
    assert!(rendered.contains("FitFindr/1.0"));
}
