//! Search configuration.
//!
//! Loaded from environment variables with sensible defaults:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `SEARCH_DEBOUNCE_MS` | `300` |
//! | `SEARCH_MIN_QUERY_LEN` | `2` |
//! | `SEARCH_MAX_RESULTS` | `5` |
//! | `SEARCH_FAILURE_POLICY` | `fail-all` (or `partial`) |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable not set
    #[error("Environment variable not set: {0}")]
    Missing(String),

    /// Environment variable set to something unparseable
    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        /// Variable name
        var: String,
        /// Value found
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Values parsed but do not make sense together
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// What to show when some collection lookups fail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Any failure empties every collection and records the error
    #[default]
    FailAll,
    /// Healthy collections keep their hits; failed ones are empty and listed
    Partial,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail-all" | "fail_all" | "all" => Ok(Self::FailAll),
            "partial" => Ok(Self::Partial),
            other => Err(format!("expected fail-all or partial, got {other}")),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailAll => write!(f, "fail-all"),
            Self::Partial => write!(f, "partial"),
        }
    }
}

/// Tuning for the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a query is looked up
    pub debounce: Duration,
    /// Shortest trimmed query that is looked up
    pub min_query_len: usize,
    /// Hits kept per collection
    pub max_results: usize,
    /// Behavior when lookups fail
    pub failure_policy: FailurePolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: 2,
            max_results: 5,
            failure_policy: FailurePolicy::FailAll,
        }
    }
}

impl SearchConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but invalid, or validation fails.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps variable names to values
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but invalid, or validation fails.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let debounce_ms: Option<u64> = parse_var(&lookup, "SEARCH_DEBOUNCE_MS")?;
        let config = Self {
            debounce: debounce_ms.map_or(defaults.debounce, Duration::from_millis),
            min_query_len: parse_var(&lookup, "SEARCH_MIN_QUERY_LEN")?
                .unwrap_or(defaults.min_query_len),
            max_results: parse_var(&lookup, "SEARCH_MAX_RESULTS")?
                .unwrap_or(defaults.max_results),
            failure_policy: parse_var(&lookup, "SEARCH_FAILURE_POLICY")?
                .unwrap_or(defaults.failure_policy),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if a query of length zero would be searchable or no hits
    /// would ever be kept.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_query_len == 0 {
            return Err(ConfigError::Validation("min_query_len must be > 0".to_string()));
        }
        if self.max_results == 0 {
            return Err(ConfigError::Validation("max_results must be > 0".to_string()));
        }
        Ok(())
    }

    /// Set the debounce delay
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the per-collection result cap
    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the failure policy
    #[must_use]
    pub const fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}

/// Parse an optional variable, treating blank values as unset
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the value does not parse.
pub fn parse_var<F, T>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                var: var.to_string(),
                value,
                reason: e.to_string(),
            }),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = SearchConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.min_query_len, 2);
        assert_eq!(config.max_results, 5);
    }

    #[test]
    fn variables_override_defaults() {
        let config = SearchConfig::from_lookup(lookup(&[
            ("SEARCH_DEBOUNCE_MS", "150"),
            ("SEARCH_MAX_RESULTS", "8"),
            ("SEARCH_FAILURE_POLICY", "partial"),
            ("SEARCH_MIN_QUERY_LEN", " "),
        ]))
        .unwrap();

        assert_eq!(config.debounce, Duration::from_millis(150));
        assert_eq!(config.max_results, 8);
        assert_eq!(config.min_query_len, 2);
        assert_eq!(config.failure_policy, FailurePolicy::Partial);
    }

    #[test]
    fn unparseable_value_names_the_variable() {
        let error = SearchConfig::from_lookup(lookup(&[("SEARCH_DEBOUNCE_MS", "soon")])).unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { ref var, .. } if var == "SEARCH_DEBOUNCE_MS"));
    }

    #[test]
    fn zero_limits_fail_validation() {
        assert!(matches!(
            SearchConfig::from_lookup(lookup(&[("SEARCH_MAX_RESULTS", "0")])),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            SearchConfig::from_lookup(lookup(&[("SEARCH_MIN_QUERY_LEN", "0")])),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn failure_policy_round_trips_through_display() {
        for policy in [FailurePolicy::FailAll, FailurePolicy::Partial] {
            assert_eq!(policy.to_string().parse::<FailurePolicy>().unwrap(), policy);
        }
        assert!("sometimes".parse::<FailurePolicy>().is_err());
    }
}
