//! Connection settings for the hosted database.

use pooja_search::config::{ConfigError, parse_var};
use std::fmt;
use std::time::Duration;

/// Where the REST endpoint lives and how to authenticate
#[derive(Clone, PartialEq, Eq)]
pub struct PostgrestConfig {
    /// Project URL, without trailing slash
    pub url: String,
    /// Anonymous (public) API key
    pub anon_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl PostgrestConfig {
    /// Default per-request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a configuration with the default timeout
    #[must_use]
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `SUPABASE_TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or key is missing, or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through `lookup`, which maps variable names to values
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or key is missing, or a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::Missing(var.to_string()))
        };

        let url = required("SUPABASE_URL")?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "SUPABASE_URL".to_string(),
                value: url,
                reason: "expected an http(s) URL".to_string(),
            });
        }

        let timeout_secs: Option<u64> = parse_var(&lookup, "SUPABASE_TIMEOUT_SECS")?;
        if timeout_secs == Some(0) {
            return Err(ConfigError::Validation("SUPABASE_TIMEOUT_SECS must be > 0".to_string()));
        }

        Ok(Self::new(url, required("SUPABASE_ANON_KEY")?)
            .with_timeout(timeout_secs.map_or(Self::DEFAULT_TIMEOUT, Duration::from_secs)))
    }
}

impl fmt::Debug for PostgrestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgrestConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn url_and_key_are_required() {
        assert_eq!(
            PostgrestConfig::from_lookup(lookup(&[("SUPABASE_ANON_KEY", "anon")])),
            Err(ConfigError::Missing("SUPABASE_URL".to_string()))
        );
        assert_eq!(
            PostgrestConfig::from_lookup(lookup(&[("SUPABASE_URL", "https://x.supabase.co")])),
            Err(ConfigError::Missing("SUPABASE_ANON_KEY".to_string()))
        );
    }

    #[test]
    fn loads_with_default_timeout() {
        let config = PostgrestConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://x.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.url, "https://x.supabase.co");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn rejects_non_http_url_and_zero_timeout() {
        assert!(matches!(
            PostgrestConfig::from_lookup(lookup(&[
                ("SUPABASE_URL", "x.supabase.co"),
                ("SUPABASE_ANON_KEY", "anon"),
            ])),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            PostgrestConfig::from_lookup(lookup(&[
                ("SUPABASE_URL", "https://x.supabase.co"),
                ("SUPABASE_ANON_KEY", "anon"),
                ("SUPABASE_TIMEOUT_SECS", "0"),
            ])),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn debug_hides_the_key() {
        let config = PostgrestConfig::new("https://x.supabase.co", "secret-key");
        assert!(!format!("{config:?}").contains("secret-key"));
    }
}
