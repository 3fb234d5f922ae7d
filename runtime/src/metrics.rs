//! Prometheus metrics for the store and the search aggregator.
//!
//! Metrics are emitted through the `metrics` facade and are no-ops until a
//! recorder is installed. [`MetricsRecorder`] installs the Prometheus exporter
//! and renders the text exposition format.
//!
//! # Example
//!
//! ```rust,no_run
//! use pooja_search_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut recorder = MetricsRecorder::new();
//! recorder.install()?;
//!
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

// Re-export metrics macros for use in other crates
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus metrics recorder.
#[derive(Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// Create a recorder that is not installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Describe all metrics and install the Prometheus recorder globally.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed. A recorder
    /// that is already installed (common in tests) is logged and ignored.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Metrics recorder installed");
                Ok(())
            },
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            },
        }
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if this recorder was never installed.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Store
    describe_counter!("store.actions.total", "Actions reduced by the store");
    describe_histogram!("store.reducer.duration_seconds", "Time spent inside the reducer");
    describe_counter!("store.effects.executed", "Effects executed, labelled by type");
    describe_counter!("store.effects.cancelled", "Cancellable effects aborted before completion");
    describe_counter!("store.shutdown.initiated", "Graceful shutdowns started");
    describe_counter!("store.shutdown.rejected_actions", "Actions rejected during shutdown");

    // Search
    describe_counter!("search.fanout.total", "Fan-outs issued to the backing store");
    describe_counter!("search.fanout.failures", "Failed collection lookups, labelled by collection");
    describe_histogram!("search.fanout.duration_seconds", "Time until all three lookups settled");
    describe_counter!("search.results.stale", "Completions discarded because a newer query superseded them");

    // Backend
    describe_counter!("postgrest.requests.total", "PostgREST lookups, labelled by table and status");
}
