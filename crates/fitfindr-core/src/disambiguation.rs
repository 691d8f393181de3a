//! Town-name collision rules, stored as data.
//!
//! A rule says: when a query names `target` followed by one of
//! `state_tokens`, the provider is likely to also return the more prominent
//! `colliding` town, and those candidates should be dropped.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub target: String,
    pub colliding: String,
    pub state_tokens: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    rules: Vec<RuleConfig>,
}

/// The collision shipped with the application: Allen, TX vs. McAllen, TX.
#[must_use]
pub fn default_disambiguation_rules() -> Vec<RuleConfig> {
    vec![RuleConfig {
        target: "Allen".to_string(),
        colliding: "McAllen".to_string(),
        state_tokens: vec!["TX".to_string(), "Texas".to_string()],
    }]
}

/// Load and validate disambiguation rules from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_disambiguation_rules(path: &Path) -> Result<Vec<RuleConfig>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: RulesFile = serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
        path: path.display().to_string(),
        source: e,
    })?;

    validate_rules(&file.rules)?;
    Ok(file.rules)
}

fn validate_rules(rules: &[RuleConfig]) -> Result<(), ConfigError> {
    for rule in rules {
        if rule.target.trim().is_empty() || rule.colliding.trim().is_empty() {
            return Err(ConfigError::Validation(
                "disambiguation rule target and colliding town must be non-empty".to_string(),
            ));
        }
        if rule.target.eq_ignore_ascii_case(&rule.colliding) {
            return Err(ConfigError::Validation(format!(
                "disambiguation rule for '{}' collides with itself",
                rule.target
            )));
        }
        if rule.state_tokens.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "disambiguation rule for '{}' needs at least one state token",
                rule.target
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_yaml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write yaml");
        file
    }

    #[test]
    fn default_rules_cover_allen_texas() {
        let rules = default_disambiguation_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].target, "Allen");
        assert_eq!(rules[0].colliding, "McAllen");
        assert!(rules[0].state_tokens.iter().any(|t| t == "Texas"));
    }

    #[test]
    fn loads_rules_from_yaml() {
        let file = write_yaml(
            "rules:\n  - target: Allen\n    colliding: McAllen\n    state_tokens: [TX, Texas]\n  - target: Kinney\n    colliding: McKinney\n    state_tokens: [TX]\n",
        );
        let rules = load_disambiguation_rules(file.path()).expect("valid rules");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].colliding, "McKinney");
    }

    #[test]
    fn shipped_rules_file_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/disambiguation.yaml");
        let rules = load_disambiguation_rules(&path).expect("shipped rules should load");
        assert_eq!(rules, default_disambiguation_rules());
    }

    #[test]
    fn rejects_rule_without_state_tokens() {
        let file = write_yaml("rules:\n  - target: Allen\n    colliding: McAllen\n    state_tokens: []\n");
        let err = load_disambiguation_rules(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_self_colliding_rule() {
        let file = write_yaml("rules:\n  - target: Allen\n    colliding: allen\n    state_tokens: [TX]\n");
        assert!(matches!(
            load_disambiguation_rules(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_disambiguation_rules(Path::new("/nonexistent/rules.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileIo { .. }));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let file = write_yaml("rules: [this is: not: valid");
        assert!(matches!(
            load_disambiguation_rules(file.path()),
            Err(ConfigError::FileParse { .. })
        ));
    }
}
