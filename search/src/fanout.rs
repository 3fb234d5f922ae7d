//! Parallel fan-out of one query to the three collections.

use crate::actions::FanoutOutcome;
use crate::backend::{LookupRequest, SearchBackend};
use std::sync::Arc;
use std::time::Instant;

/// Look `request` up in every collection concurrently and wait for all three
///
/// Lookups are joined, not raced: nothing is reported until the slowest one
/// settles. Each successful collection is truncated to `request.limit` even if
/// the backend returned more.
#[tracing::instrument(skip(backend, request), fields(pattern = %request.pattern))]
pub async fn fan_out(backend: Arc<dyn SearchBackend>, request: LookupRequest) -> FanoutOutcome {
    metrics::counter!("search.fanout.total").increment(1);
    let start = Instant::now();
    let limit = request.limit;

    let (poojas, temples, pundits) = futures::join!(
        backend.search_poojas(request.clone()),
        backend.search_temples(request.clone()),
        backend.search_pundits(request),
    );

    let outcome = FanoutOutcome {
        poojas,
        temples,
        pundits,
    }
    .capped(limit);

    for failure in outcome.failures() {
        tracing::warn!(collection = %failure.collection(), error = %failure, "Lookup failed");
        metrics::counter!("search.fanout.failures", "collection" => failure.collection().table())
            .increment(1);
    }

    metrics::histogram!("search.fanout.duration_seconds").record(start.elapsed().as_secs_f64());
    tracing::debug!(elapsed_ms = start.elapsed().as_millis(), "Fan-out settled");

    outcome
}
