//! Reducer for the search box.
//!
//! ```text
//!            short query / Clear
//!   ┌──────────────────────────────────────┐
//!   ▼                                      │
//! Idle ──debounced query──► Loading ──ok──► Ready
//!                              │
//!                              └──error──► Failed ──Retry──► Loading
//! ```
//!
//! Every fan-out is issued under a new generation. A completion whose
//! generation is no longer current belongs to a superseded query and is
//! dropped, so a slow earlier lookup can never overwrite a newer one.

use crate::actions::{FanoutOutcome, SearchAction};
use crate::backend::{LookupRequest, SearchBackend};
use crate::config::{FailurePolicy, SearchConfig};
use crate::fanout;
use crate::types::{Query, SearchPhase, SearchResults, SearchState};
use pooja_search_core::{
    effect::{Effect, EffectId},
    environment::Clock,
    reducer::Reducer,
    SmallVec, smallvec,
};
use std::sync::Arc;

/// Cancellation key of the pending debounce timer
pub const DEBOUNCE: EffectId = EffectId::new("search.debounce");

/// Environment dependencies for the search reducer
#[derive(Clone)]
pub struct SearchEnvironment {
    /// Backing store client, constructed at bootstrap
    pub backend: Arc<dyn SearchBackend>,
    /// Tuning
    pub config: SearchConfig,
    /// Clock for completion timestamps
    pub clock: Arc<dyn Clock>,
}

impl SearchEnvironment {
    /// Creates a new `SearchEnvironment`
    #[must_use]
    pub fn new(backend: Arc<dyn SearchBackend>, config: SearchConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            config,
            clock,
        }
    }
}

/// Reducer for the search box
#[derive(Clone, Debug, Default)]
pub struct SearchReducer;

impl SearchReducer {
    /// Creates a new `SearchReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn query_changed(
        state: &mut SearchState,
        query: Query,
        env: &SearchEnvironment,
    ) -> SmallVec<[Effect<SearchAction>; 4]> {
        state.query = query.clone();

        if !query.is_searchable(env.config.min_query_len) {
            tracing::debug!(query = %query, "Query too short, clearing results");
            state.reset();
            return smallvec![Effect::Cancel(DEBOUNCE)];
        }

        smallvec![Effect::debounce(
            DEBOUNCE,
            env.config.debounce,
            SearchAction::QueryDebounced { query },
        )]
    }

    fn query_debounced(
        state: &mut SearchState,
        query: Query,
        env: &SearchEnvironment,
    ) -> SmallVec<[Effect<SearchAction>; 4]> {
        // A keystroke can land between the timer firing and this action being reduced
        if query != state.query || !query.is_searchable(env.config.min_query_len) {
            tracing::trace!(query = %query, "Ignoring superseded debounce");
            return SmallVec::new();
        }

        let unchanged = state
            .active_query
            .as_ref()
            .is_some_and(|active| active.same_search_as(&query));
        if unchanged && state.phase != SearchPhase::Idle {
            tracing::trace!(query = %query, "Query unchanged, not searching again");
            return SmallVec::new();
        }

        Self::start_fanout(state, query, env)
    }

    fn start_fanout(
        state: &mut SearchState,
        query: Query,
        env: &SearchEnvironment,
    ) -> SmallVec<[Effect<SearchAction>; 4]> {
        state.generation += 1;
        state.phase = SearchPhase::Loading;
        state.error = None;
        state.failed_collections.clear();

        let generation = state.generation;
        let backend = Arc::clone(&env.backend);
        let request = LookupRequest::new(query.normalized(), env.config.max_results);
        state.active_query = Some(query);

        tracing::debug!(generation, pattern = %request.pattern, "Searching");

        smallvec![Effect::Future(Box::pin(async move {
            let outcome = fanout::fan_out(backend, request).await;
            Some(SearchAction::SearchCompleted {
                generation,
                outcome,
            })
        }))]
    }

    fn search_completed(
        state: &mut SearchState,
        generation: u64,
        outcome: FanoutOutcome,
        env: &SearchEnvironment,
    ) {
        if generation != state.generation {
            tracing::debug!(
                generation,
                current = state.generation,
                "Discarding stale search results"
            );
            metrics::counter!("search.results.stale").increment(1);
            return;
        }

        let outcome = outcome.capped(env.config.max_results);
        let failures = outcome.failures();
        state.updated_at = Some(env.clock.now());
        state.failed_collections = failures.iter().map(|f| f.collection()).collect();

        let Some(first_failure) = failures.into_iter().next() else {
            state.results = outcome.into_partial_results();
            state.error = None;
            state.phase = SearchPhase::Ready;
            tracing::debug!(generation, hits = state.results.len(), "Search ready");
            return;
        };

        match env.config.failure_policy {
            FailurePolicy::FailAll => {
                state.results = SearchResults::default();
                state.phase = SearchPhase::Failed;
            },
            FailurePolicy::Partial => {
                state.results = outcome.into_partial_results();
                state.phase = if state.failed_collections.len() == 3 {
                    SearchPhase::Failed
                } else {
                    SearchPhase::Ready
                };
            },
        }

        tracing::debug!(generation, error = %first_failure, phase = ?state.phase, "Search failed");
        state.error = Some(first_failure);
    }

    fn retry(state: &mut SearchState, env: &SearchEnvironment) -> SmallVec<[Effect<SearchAction>; 4]> {
        let Some(query) = state.active_query.clone() else {
            return SmallVec::new();
        };

        if state.error.is_none() || state.is_loading() {
            return SmallVec::new();
        }

        tracing::debug!(query = %query, "Retrying search");
        Self::start_fanout(state, query, env)
    }
}

impl Reducer for SearchReducer {
    type State = SearchState;
    type Action = SearchAction;
    type Environment = SearchEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Search box ==========
            SearchAction::QueryChanged { query } => Self::query_changed(state, query, env),

            SearchAction::Retry => Self::retry(state, env),

            SearchAction::Clear => {
                state.query = Query::default();
                state.reset();
                smallvec![Effect::Cancel(DEBOUNCE)]
            },

            // ========== Effects ==========
            SearchAction::QueryDebounced { query } => Self::query_debounced(state, query, env),

            SearchAction::SearchCompleted {
                generation,
                outcome,
            } => {
                Self::search_completed(state, generation, outcome, env);
                SmallVec::new()
            },
        }
    }
}
