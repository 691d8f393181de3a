//! Query normalization ahead of the geocoding call.
//!
//! Two independent concerns live here:
//!
//! - [`normalize_address`] expands street-type abbreviations so the provider
//!   sees the long forms it indexes best.
//! - [`DisambiguationRules`] detect queries naming a town that collides with
//!   a more prominent one (Allen, TX vs. McAllen, TX). Detection only flags
//!   the query; it never rewrites it. Filtering happens on the candidates.

use std::sync::LazyLock;

use fitfindr_core::RuleConfig;
use regex::Regex;

use crate::error::GeoError;

const STREET_ABBREVIATIONS: &[(&str, &str)] = &[
    ("St", "Street"),
    ("Ave", "Avenue"),
    ("Blvd", "Boulevard"),
    ("Dr", "Drive"),
    ("Rd", "Road"),
    ("Ln", "Lane"),
    ("Ct", "Court"),
    ("Pl", "Place"),
    ("Pkwy", "Parkway"),
    ("Hwy", "Highway"),
    ("Fwy", "Freeway"),
];

static ABBREVIATION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    STREET_ABBREVIATIONS
        .iter()
        .map(|(short, long)| {
            let re = Regex::new(&format!(r"(?i)\b{short}\b")).expect("valid abbreviation regex");
            (re, *long)
        })
        .collect()
});

/// Expand whole-word street-type abbreviations, case-insensitively.
///
/// `"123 Main St"` becomes `"123 Main Street"`; `"Stanley Ave"` becomes
/// `"Stanley Avenue"` (the `St` inside `Stanley` is not a word).
#[must_use]
pub fn normalize_address(raw: &str) -> String {
    ABBREVIATION_PATTERNS
        .iter()
        .fold(raw.to_string(), |acc, (re, long)| {
            re.replace_all(&acc, *long).into_owned()
        })
}

/// One compiled town-collision rule.
#[derive(Debug, Clone)]
pub struct DisambiguationRule {
    target: String,
    colliding: String,
    target_lower: String,
    colliding_lower: String,
    trigger: Regex,
}

impl DisambiguationRule {
    /// Compile a rule. The trigger matches `target` as a whole word, then a
    /// comma, then one of `state_tokens` as a whole word, ignoring case and
    /// surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidRule`] if a token is blank or the trigger
    /// pattern cannot be compiled.
    pub fn new(target: &str, colliding: &str, state_tokens: &[String]) -> Result<Self, GeoError> {
        let target = target.trim();
        let colliding = colliding.trim();
        if target.is_empty() || colliding.is_empty() {
            return Err(GeoError::InvalidRule(
                "target and colliding town must be non-empty".to_string(),
            ));
        }

        let states: Vec<String> = state_tokens
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(regex::escape)
            .collect();
        if states.is_empty() {
            return Err(GeoError::InvalidRule(format!(
                "rule for '{target}' has no state tokens"
            )));
        }

        let pattern = format!(
            r"(?i)\b{}\s*,\s*(?:{})\b",
            regex::escape(target),
            states.join("|")
        );
        let trigger = Regex::new(&pattern)
            .map_err(|e| GeoError::InvalidRule(format!("rule for '{target}': {e}")))?;

        Ok(Self {
            target: target.to_string(),
            colliding: colliding.to_string(),
            target_lower: target.to_lowercase(),
            colliding_lower: colliding.to_lowercase(),
            trigger,
        })
    }

    /// # Errors
    ///
    /// See [`DisambiguationRule::new`].
    pub fn from_config(config: &RuleConfig) -> Result<Self, GeoError> {
        Self::new(&config.target, &config.colliding, &config.state_tokens)
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn colliding(&self) -> &str {
        &self.colliding
    }

    #[must_use]
    pub fn is_triggered_by(&self, query: &str) -> bool {
        self.trigger.is_match(query)
    }

    /// Whether a candidate's display name names the target town and not the
    /// colliding one.
    #[must_use]
    pub fn accepts(&self, display_name: &str) -> bool {
        let name = display_name.to_lowercase();
        name.contains(&self.target_lower) && !name.contains(&self.colliding_lower)
    }
}

/// The active set of collision rules.
#[derive(Debug, Clone)]
pub struct DisambiguationRules {
    rules: Vec<DisambiguationRule>,
}

impl DisambiguationRules {
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// # Errors
    ///
    /// Returns [`GeoError::InvalidRule`] for the first rule that fails to compile.
    pub fn from_configs(configs: &[RuleConfig]) -> Result<Self, GeoError> {
        let rules = configs
            .iter()
            .map(DisambiguationRule::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Rules whose trigger fires on `query`.
    #[must_use]
    pub fn triggered(&self, query: &str) -> Vec<&DisambiguationRule> {
        self.rules
            .iter()
            .filter(|rule| rule.is_triggered_by(query))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

static BUILTIN_RULES: LazyLock<DisambiguationRules> = LazyLock::new(|| {
    DisambiguationRules::from_configs(&fitfindr_core::default_disambiguation_rules())
        .expect("valid built-in disambiguation rules")
});

impl Default for DisambiguationRules {
    /// The built-in Allen/McAllen rule.
    fn default() -> Self {
        BUILTIN_RULES.clone()
    }
}
