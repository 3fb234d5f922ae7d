//! Backing store read API.
//!
//! The aggregator reads three collections through [`SearchBackend`]. Each
//! method is one filtered list operation: records whose active flag is set
//! and whose searched columns contain the pattern (case-insensitive), in
//! backing-store order, at most `limit` of them.
//!
//! # Implementations
//!
//! - `PostgrestBackend` (in `pooja-search-postgrest`): the hosted database over HTTP
//! - [`InMemorySearchBackend`](crate::mocks::InMemorySearchBackend): deterministic tests
//!
//! # Dyn Compatibility
//!
//! Methods return `Pin<Box<dyn Future>>` instead of using `async fn` so the
//! backend can be shared as `Arc<dyn SearchBackend>` and captured by effects.

use crate::types::{PoojaHit, PunditHit, TempleHit};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Future returned by every [`SearchBackend`] lookup
pub type LookupFuture<'a, T> = Pin<Box<dyn Future<Output = Result<Vec<T>, BackendError>> + Send + 'a>>;

/// Errors a backend lookup can fail with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The API key was rejected
    #[error("Unauthorized - check the API key")]
    Unauthorized,

    /// Too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Any other non-success status
    #[error("Backend error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// The response body did not decode into hits
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The backend cannot serve requests at all
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Parameters shared by the three lookups of one fan-out
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupRequest {
    /// Trimmed query text to look for
    pub pattern: String,
    /// Maximum number of hits to return
    pub limit: usize,
}

impl LookupRequest {
    /// Creates a request
    #[must_use]
    pub fn new(pattern: impl Into<String>, limit: usize) -> Self {
        Self {
            pattern: pattern.into(),
            limit,
        }
    }
}

/// Read access to the three searchable collections
pub trait SearchBackend: Send + Sync {
    /// Active rituals matching the pattern
    fn search_poojas(&self, request: LookupRequest) -> LookupFuture<'_, PoojaHit>;

    /// Active temples matching the pattern
    fn search_temples(&self, request: LookupRequest) -> LookupFuture<'_, TempleHit>;

    /// Active pundits matching the pattern
    fn search_pundits(&self, request: LookupRequest) -> LookupFuture<'_, PunditHit>;
}
