//! Interactive search box.
//!
//! Every line read from stdin replaces the text in the search box. Snapshots
//! are printed to stdout as JSON whenever a search starts or settles; logs go
//! to stderr.
//!
//! ```bash
//! # Against a Supabase project (SUPABASE_URL, SUPABASE_ANON_KEY, optionally in .env)
//! cargo run -p search-repl
//!
//! # Against the built-in catalog
//! cargo run -p search-repl -- --offline
//! ```
//!
//! Commands: `:retry`, `:clear`, `:metrics`, `:quit`.

mod catalog;

use anyhow::Context;
use pooja_search::{
    Query, SearchAction, SearchBackend, SearchConfig, SearchEnvironment, SearchReducer,
    SearchState,
};
use pooja_search_core::environment::SystemClock;
use pooja_search_postgrest::PostgrestBackend;
use pooja_search_runtime::{Store, metrics::MetricsRecorder};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type SearchStore = Store<SearchState, SearchAction, SearchEnvironment, SearchReducer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "search_repl=info,pooja_search=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = SearchConfig::from_env().context("invalid search configuration")?;
    info!(
        debounce_ms = config.debounce.as_millis(),
        min_query_len = config.min_query_len,
        max_results = config.max_results,
        failure_policy = %config.failure_policy,
        "Configuration loaded"
    );

    let offline = std::env::args().any(|arg| arg == "--offline");
    let backend: Arc<dyn SearchBackend> = if offline {
        info!("Using the built-in catalog");
        Arc::new(catalog::demo_backend())
    } else {
        let backend = PostgrestBackend::from_env().context("invalid PostgREST configuration")?;
        info!(url = %backend.config().url, "Using PostgREST backend");
        Arc::new(backend)
    };

    let mut recorder = MetricsRecorder::new();
    recorder.install()?;

    let env = SearchEnvironment::new(backend, config, Arc::new(SystemClock));
    let store = Store::new(SearchState::new(), SearchReducer::new(), env);

    let renderer = tokio::spawn(render_on_change(store.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":quit" => break,
            ":retry" => {
                store.send(SearchAction::Retry).await?;
            },
            ":clear" => {
                store.send(SearchAction::Clear).await?;
                print_snapshot(&store).await?;
            },
            ":metrics" => match recorder.render() {
                Some(text) => println!("{text}"),
                None => println!("metrics recorder not installed"),
            },
            _ => {
                let query = Query::new(line);
                let searchable = query.is_searchable(config.min_query_len);
                store.send(SearchAction::QueryChanged { query }).await?;
                // Short input clears immediately, without a round-trip
                if !searchable {
                    print_snapshot(&store).await?;
                }
            },
        }
    }

    info!("Shutting down");
    store.shutdown(Duration::from_secs(5)).await?;
    renderer.abort();

    Ok(())
}

/// Print a snapshot whenever a search starts or settles
async fn render_on_change(store: SearchStore) -> anyhow::Result<()> {
    let mut actions = store.subscribe_actions();

    loop {
        match actions.recv().await {
            Ok(SearchAction::QueryDebounced { .. } | SearchAction::SearchCompleted { .. }) => {
                print_snapshot(&store).await?;
            },
            Ok(_) => {},
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Renderer lagged behind");
            },
            Err(RecvError::Closed) => return Ok(()),
        }
    }
}

async fn print_snapshot(store: &SearchStore) -> anyhow::Result<()> {
    let snapshot = store.state(SearchState::snapshot).await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
