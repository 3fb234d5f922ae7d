//! Actions and fan-out outcomes.

use crate::backend::BackendError;
use crate::error::SearchError;
use crate::types::{Collection, PoojaHit, PunditHit, Query, SearchResults, TempleHit};

/// Every input to the search reducer
#[derive(Clone, Debug, PartialEq)]
pub enum SearchAction {
    // ========== From the search box ==========
    /// The text in the search box changed
    QueryChanged {
        /// New raw input
        query: Query,
    },

    /// Run the last failed search again
    Retry,

    /// Empty the search box
    Clear,

    // ========== From effects ==========
    /// The debounce timer for `query` ran out without another keystroke
    QueryDebounced {
        /// Query that settled
        query: Query,
    },

    /// All three lookups of a fan-out settled
    SearchCompleted {
        /// Token the fan-out was issued under
        generation: u64,
        /// Per-collection results
        outcome: FanoutOutcome,
    },
}

impl SearchAction {
    /// Shorthand for [`SearchAction::QueryChanged`]
    #[must_use]
    pub fn query_changed(query: impl Into<Query>) -> Self {
        Self::QueryChanged {
            query: query.into(),
        }
    }
}

/// Per-collection results of one fan-out
///
/// Each collection settles independently; the failure policy decides what
/// the state shows when some of them failed.
#[derive(Clone, Debug, PartialEq)]
pub struct FanoutOutcome {
    /// Ritual lookup result
    pub poojas: Result<Vec<PoojaHit>, BackendError>,
    /// Temple lookup result
    pub temples: Result<Vec<TempleHit>, BackendError>,
    /// Pundit lookup result
    pub pundits: Result<Vec<PunditHit>, BackendError>,
}

impl FanoutOutcome {
    /// Outcome where every lookup succeeded
    #[must_use]
    pub fn succeeded(results: SearchResults) -> Self {
        Self {
            poojas: Ok(results.poojas),
            temples: Ok(results.temples),
            pundits: Ok(results.pundits),
        }
    }

    /// Failed lookups, in fan-out order
    #[must_use]
    pub fn failures(&self) -> Vec<SearchError> {
        let failure = |collection, result: Result<(), &BackendError>| {
            result.err().map(|source| SearchError::LookupFailure {
                collection,
                source: source.clone(),
            })
        };

        [
            failure(Collection::Poojas, self.poojas.as_ref().map(|_| ())),
            failure(Collection::Temples, self.temples.as_ref().map(|_| ())),
            failure(Collection::Pundits, self.pundits.as_ref().map(|_| ())),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Hits from the successful lookups, failed collections left empty
    #[must_use]
    pub fn into_partial_results(self) -> SearchResults {
        SearchResults {
            poojas: self.poojas.unwrap_or_default(),
            temples: self.temples.unwrap_or_default(),
            pundits: self.pundits.unwrap_or_default(),
        }
    }

    /// Truncates every successful collection to `max` hits
    #[must_use]
    pub fn capped(mut self, max: usize) -> Self {
        if let Ok(hits) = &mut self.poojas {
            hits.truncate(max);
        }
        if let Ok(hits) = &mut self.temples {
            hits.truncate(max);
        }
        if let Ok(hits) = &mut self.pundits {
            hits.truncate(max);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_listed_in_fanout_order() {
        let outcome = FanoutOutcome {
            poojas: Ok(vec![PoojaHit::new("p1", "Satyanarayan Katha")]),
            temples: Err(BackendError::RateLimited),
            pundits: Err(BackendError::Unauthorized),
        };

        let collections: Vec<_> = outcome.failures().iter().map(SearchError::collection).collect();
        assert_eq!(collections, vec![Collection::Temples, Collection::Pundits]);

        let partial = outcome.into_partial_results();
        assert_eq!(partial.poojas.len(), 1);
        assert!(partial.temples.is_empty());
        assert!(partial.pundits.is_empty());
    }

    #[test]
    fn capped_leaves_failures_alone() {
        let outcome = FanoutOutcome {
            poojas: Ok((0..9).map(|i| PoojaHit::new(i.to_string(), "Puja")).collect()),
            temples: Ok(Vec::new()),
            pundits: Err(BackendError::RateLimited),
        }
        .capped(5);

        assert_eq!(outcome.poojas.as_ref().map(Vec::len), Ok(5));
        assert_eq!(outcome.pundits, Err(BackendError::RateLimited));
    }
}
