//! Error types for the search aggregator

use crate::backend::BackendError;
use crate::types::Collection;
use thiserror::Error;

/// Errors recorded in [`SearchState`](crate::SearchState)
///
/// These never propagate out of the store: a failed lookup becomes the
/// `error` field of the state. Queries that are too short are not errors
/// (the state returns to `Idle`), and completions of superseded queries are
/// dropped silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A collection lookup failed
    #[error("{collection} lookup failed: {source}")]
    LookupFailure {
        /// Collection whose lookup failed
        collection: Collection,
        /// What the backend reported
        source: BackendError,
    },
}

impl SearchError {
    /// Collection the error belongs to
    #[must_use]
    pub const fn collection(&self) -> Collection {
        match self {
            Self::LookupFailure { collection, .. } => *collection,
        }
    }
}
