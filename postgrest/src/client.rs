//! PostgREST implementation of [`SearchBackend`]

use crate::{config::PostgrestConfig, error};
use pooja_search::{
    BackendError, Collection, LookupFuture, LookupRequest, PoojaHit, PunditHit, SearchBackend,
    TempleHit,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Search backend reading the marketplace tables over PostgREST
#[derive(Clone)]
pub struct PostgrestBackend {
    client: Client,
    config: PostgrestConfig,
}

impl PostgrestBackend {
    /// Create a backend for the given project
    #[must_use]
    pub fn new(config: PostgrestConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create a backend from `SUPABASE_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or key is missing, or a value is invalid.
    pub fn from_env() -> Result<Self, pooja_search::ConfigError> {
        Ok(Self::new(PostgrestConfig::from_env()?))
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &PostgrestConfig {
        &self.config
    }

    /// Query string for one lookup
    fn query_params(collection: Collection, request: &LookupRequest) -> [(String, String); 4] {
        [
            ("select".to_string(), collection.columns().join(",")),
            ("or".to_string(), or_filter(collection.searched_columns(), &request.pattern)),
            (collection.active_column().to_string(), "eq.true".to_string()),
            ("limit".to_string(), request.limit.to_string()),
        ]
    }

    #[tracing::instrument(skip(self, request), fields(table = collection.table()))]
    async fn select<T>(&self, collection: Collection, request: LookupRequest) -> Result<Vec<T>, BackendError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/rest/v1/{}", self.config.url, collection.table());

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .header("accept", "application/json")
            .query(&Self::query_params(collection, &request))
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| error::from_transport(&e))?;

        let status = response.status();
        metrics::counter!(
            "postgrest.requests.total",
            "table" => collection.table(),
            "status" => status.as_u16().to_string()
        )
        .increment(1);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "Lookup rejected");
            return Err(error::from_status(status, body));
        }

        let hits = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| BackendError::ResponseParseFailed(e.to_string()))?;

        tracing::trace!(hits = hits.len(), "Lookup succeeded");
        Ok(hits)
    }
}

impl std::fmt::Debug for PostgrestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestBackend")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SearchBackend for PostgrestBackend {
    fn search_poojas(&self, request: LookupRequest) -> LookupFuture<'_, PoojaHit> {
        Box::pin(self.select(Collection::Poojas, request))
    }

    fn search_temples(&self, request: LookupRequest) -> LookupFuture<'_, TempleHit> {
        Box::pin(self.select(Collection::Temples, request))
    }

    fn search_pundits(&self, request: LookupRequest) -> LookupFuture<'_, PunditHit> {
        Box::pin(self.select(Collection::Pundits, request))
    }
}

/// `or` filter matching `pattern` anywhere in any of `columns`, ignoring case
///
/// `%` and `_` in the pattern match themselves. The pattern is double-quoted
/// so commas, dots and parentheses in user input cannot break out of the
/// filter expression.
#[must_use]
pub fn or_filter(columns: &[&str], pattern: &str) -> String {
    let quoted = quote(&format!("*{}*", escape_like(pattern)));
    let clauses: Vec<String> = columns
        .iter()
        .map(|column| format!("{column}.ilike.{quoted}"))
        .collect();
    format!("({})", clauses.join(","))
}

/// Backslash-escapes the `LIKE` metacharacters
fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_filter_covers_every_searched_column() {
        assert_eq!(
            or_filter(Collection::Temples.searched_columns(), "kashi"),
            r#"(name.ilike."*kashi*",city.ilike."*kashi*",state.ilike."*kashi*")"#
        );
    }

    #[test]
    fn or_filter_escapes_quotes_and_backslashes() {
        // The backslash is escaped once for LIKE and once more for the quoted value
        assert_eq!(or_filter(&["name"], r#"a"b\c"#), r#"(name.ilike."*a\"b\\\\c*")"#);
    }

    #[test]
    fn or_filter_matches_like_wildcards_literally() {
        assert_eq!(or_filter(&["name"], "50%"), r#"(name.ilike."*50\\%*")"#);
        assert_eq!(or_filter(&["name"], "a_"), r#"(name.ilike."*a\\_*")"#);
        assert_eq!(escape_like("__"), r"\_\_");
    }

    #[test]
    fn query_params_select_only_active_records() {
        let params = PostgrestBackend::query_params(Collection::Pundits, &LookupRequest::new("sharma", 5));
        assert_eq!(params[0], ("select".to_string(), "id,name,location,specialization".to_string()));
        assert_eq!(params[2], ("is_active".to_string(), "eq.true".to_string()));
        assert_eq!(params[3], ("limit".to_string(), "5".to_string()));
    }
}
