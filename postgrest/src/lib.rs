//! # PostgREST Search Backend
//!
//! [`SearchBackend`](pooja_search::SearchBackend) over a hosted Postgres
//! exposed through PostgREST (as Supabase projects are). Each lookup is a
//! single `GET /rest/v1/{table}` with an `ilike` filter over the searched
//! columns, restricted to active records and limited server-side.
//!
//! ## Example
//!
//! ```no_run
//! use pooja_search::{LookupRequest, SearchBackend};
//! use pooja_search_postgrest::PostgrestBackend;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads SUPABASE_URL and SUPABASE_ANON_KEY
//!     let backend = PostgrestBackend::from_env()?;
//!
//!     let temples = backend.search_temples(LookupRequest::new("varanasi", 5)).await?;
//!     println!("{temples:?}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
mod error;

pub use client::{PostgrestBackend, or_filter};
pub use config::PostgrestConfig;
