//! In-memory backend for tests and demos.
//!
//! Behaves like the hosted store for the parts the aggregator relies on:
//! inactive records are skipped, matching is case-insensitive "contains" over
//! the searched fields, and at most `limit` hits come back in insertion order.
//! On top of that it can fail a collection, delay lookups per pattern, and
//! count calls.

use crate::backend::{BackendError, LookupFuture, LookupRequest, SearchBackend};
use crate::types::{Collection, PoojaHit, PunditHit, SearchHit, TempleHit};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct Records {
    poojas: Vec<PoojaHit>,
    temples: Vec<TempleHit>,
    pundits: Vec<PunditHit>,
    inactive: HashSet<String>,
    failing: HashMap<Collection, BackendError>,
    latency: Duration,
    latency_by_pattern: HashMap<String, Duration>,
    ignore_limit: bool,
}

impl Records {
    fn latency_for(&self, pattern: &str) -> Duration {
        self.latency_by_pattern
            .get(&pattern.to_lowercase())
            .copied()
            .unwrap_or(self.latency)
    }

    fn select<T>(&self, hits: &[T], request: &LookupRequest) -> Vec<T>
    where
        T: SearchHit + Clone,
    {
        let needle = request.pattern.to_lowercase();
        let limit = if self.ignore_limit { usize::MAX } else { request.limit };

        hits.iter()
            .filter(|hit| !self.inactive.contains(hit.id()) && hit.matches(&needle))
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Mock backend over in-memory records
///
/// Clones share records and counters, so a test can keep one handle and give
/// another to the environment.
#[derive(Debug, Clone, Default)]
pub struct InMemorySearchBackend {
    records: Arc<Mutex<Records>>,
    calls: Arc<[AtomicUsize; 3]>,
}

impl InMemorySearchBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, f: impl FnOnce(&mut Records)) {
        if let Ok(mut records) = self.records.lock() {
            f(&mut records);
        }
    }

    /// Add active rituals
    #[must_use]
    pub fn with_poojas(self, hits: impl IntoIterator<Item = PoojaHit>) -> Self {
        self.update(|r| r.poojas.extend(hits));
        self
    }

    /// Add active temples
    #[must_use]
    pub fn with_temples(self, hits: impl IntoIterator<Item = TempleHit>) -> Self {
        self.update(|r| r.temples.extend(hits));
        self
    }

    /// Add active pundits
    #[must_use]
    pub fn with_pundits(self, hits: impl IntoIterator<Item = PunditHit>) -> Self {
        self.update(|r| r.pundits.extend(hits));
        self
    }

    /// Mark the record with `id` inactive in every collection
    #[must_use]
    pub fn deactivate(self, id: impl Into<String>) -> Self {
        self.update(|r| {
            r.inactive.insert(id.into());
        });
        self
    }

    /// Delay every lookup
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.update(|r| r.latency = latency);
        self
    }

    /// Delay lookups for one pattern (compared case-insensitively)
    #[must_use]
    pub fn with_latency_for(self, pattern: &str, latency: Duration) -> Self {
        self.update(|r| {
            r.latency_by_pattern.insert(pattern.to_lowercase(), latency);
        });
        self
    }

    /// Return every match regardless of the requested limit
    #[must_use]
    pub fn ignore_limit(self) -> Self {
        self.update(|r| r.ignore_limit = true);
        self
    }

    /// Make every lookup on `collection` fail with `error`
    #[must_use]
    pub fn fail(self, collection: Collection, error: BackendError) -> Self {
        self.set_failure(collection, Some(error));
        self
    }

    /// Start or stop failing lookups on `collection`
    pub fn set_failure(&self, collection: Collection, error: Option<BackendError>) {
        self.update(|r| match error {
            Some(error) => {
                r.failing.insert(collection, error);
            },
            None => {
                r.failing.remove(&collection);
            },
        });
    }

    /// Lookups issued against `collection` so far
    #[must_use]
    pub fn calls(&self, collection: Collection) -> usize {
        self.calls[collection.index()].load(Ordering::SeqCst)
    }

    /// Lookups issued against all collections so far
    #[must_use]
    pub fn total_calls(&self) -> usize {
        Collection::ALL.iter().map(|c| self.calls(*c)).sum()
    }

    fn lookup<T, F>(&self, collection: Collection, request: LookupRequest, pick: F) -> LookupFuture<'_, T>
    where
        T: SearchHit + Clone + Send + 'static,
        F: FnOnce(&Records) -> &[T],
    {
        self.calls[collection.index()].fetch_add(1, Ordering::SeqCst);

        let prepared = self
            .records
            .lock()
            .map_err(|_| BackendError::Unavailable("mock records poisoned".to_string()))
            .map(|guard| {
                let records: &Records = &guard;
                let latency = records.latency_for(&request.pattern);
                let result = match records.failing.get(&collection) {
                    Some(error) => Err(error.clone()),
                    None => Ok(records.select(pick(records), &request)),
                };
                (latency, result)
            });

        Box::pin(async move {
            let (latency, result) = prepared?;
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result
        })
    }
}

impl SearchBackend for InMemorySearchBackend {
    fn search_poojas(&self, request: LookupRequest) -> LookupFuture<'_, PoojaHit> {
        self.lookup(Collection::Poojas, request, |r| &r.poojas)
    }

    fn search_temples(&self, request: LookupRequest) -> LookupFuture<'_, TempleHit> {
        self.lookup(Collection::Temples, request, |r| &r.temples)
    }

    fn search_pundits(&self, request: LookupRequest) -> LookupFuture<'_, PunditHit> {
        self.lookup(Collection::Pundits, request, |r| &r.pundits)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn skips_inactive_and_honours_limit() {
        let backend = InMemorySearchBackend::new()
            .with_temples([
                TempleHit::new("t1", "Kashi Vishwanath").located("Varanasi", "Uttar Pradesh"),
                TempleHit::new("t2", "Sankat Mochan").located("Varanasi", "Uttar Pradesh"),
                TempleHit::new("t3", "Durga Kund").located("Varanasi", "Uttar Pradesh"),
            ])
            .deactivate("t2");

        let hits = backend
            .search_temples(LookupRequest::new("VARANASI", 1))
            .await
            .unwrap();
        assert_eq!(hits, vec![TempleHit::new("t1", "Kashi Vishwanath").located("Varanasi", "Uttar Pradesh")]);

        let hits = backend
            .search_temples(LookupRequest::new("varanasi", 5))
            .await
            .unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
    }

    #[tokio::test]
    async fn failure_can_be_switched_off() {
        let backend = InMemorySearchBackend::new().fail(Collection::Poojas, BackendError::RateLimited);

        assert_eq!(
            backend.search_poojas(LookupRequest::new("havan", 5)).await,
            Err(BackendError::RateLimited)
        );

        backend.set_failure(Collection::Poojas, None);
        assert_eq!(backend.search_poojas(LookupRequest::new("havan", 5)).await, Ok(vec![]));
        assert_eq!(backend.calls(Collection::Poojas), 2);
        assert_eq!(backend.total_calls(), 2);
    }
}
