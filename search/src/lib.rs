//! # Pooja Search
//!
//! Debounced search across the marketplace's three collections: poojas
//! (rituals), temples, and pundits (priests).
//!
//! Keystrokes arrive as [`SearchAction::QueryChanged`]. Once the input has
//! been quiet for the configured delay and is long enough, the query is looked
//! up in all three collections concurrently through a [`SearchBackend`]. The
//! combined results land in [`SearchState`] unless a newer query has been
//! issued in the meantime.
//!
//! ## Example
//!
//! ```ignore
//! use pooja_search::{SearchAction, SearchConfig, SearchEnvironment, SearchReducer, SearchState};
//! use pooja_search_runtime::Store;
//!
//! let env = SearchEnvironment::new(backend, SearchConfig::from_env()?, Arc::new(SystemClock));
//! let store = Store::new(SearchState::new(), SearchReducer::new(), env);
//!
//! store.send(SearchAction::query_changed("Ganesh")).await?;
//! let snapshot = store.state(SearchState::snapshot).await;
//! ```

pub mod actions;
pub mod backend;
pub mod config;
pub mod error;
pub mod fanout;
pub mod reducer;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod mocks;

pub use actions::{FanoutOutcome, SearchAction};
pub use backend::{BackendError, LookupFuture, LookupRequest, SearchBackend};
pub use config::{ConfigError, FailurePolicy, SearchConfig};
pub use error::SearchError;
pub use reducer::{DEBOUNCE, SearchEnvironment, SearchReducer};
pub use types::{
    Collection, PoojaHit, PunditHit, Query, SearchHit, SearchPhase, SearchResults, SearchSnapshot,
    SearchState, TempleHit,
};
