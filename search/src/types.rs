//! Domain types for the search aggregator.
//!
//! The search box feeds a [`Query`] on every keystroke. Once the query settles
//! it is looked up in three collections, and the hits are gathered into
//! [`SearchResults`], which lives inside [`SearchState`] next to the phase of
//! the state machine and the last error.

use crate::error::SearchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw text typed into the search box
///
/// Stored as typed; comparisons and lookups use the trimmed form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Wraps the raw input
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw input, untrimmed
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The input with surrounding whitespace removed
    #[must_use]
    pub fn normalized(&self) -> &str {
        self.0.trim()
    }

    /// Length of the trimmed input in characters
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.normalized().chars().count()
    }

    /// Whether the trimmed input is long enough to search for
    #[must_use]
    pub fn is_searchable(&self, min_len: usize) -> bool {
        self.char_len() >= min_len
    }

    /// Whether both queries trim to the same text
    #[must_use]
    pub fn same_search_as(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the three searchable collections
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Ritual services
    Poojas,
    /// Temples hosting rituals
    Temples,
    /// Officiating priests
    Pundits,
}

impl Collection {
    /// Every collection, in fan-out order
    pub const ALL: [Self; 3] = [Self::Poojas, Self::Temples, Self::Pundits];

    /// Position in [`Collection::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Poojas => 0,
            Self::Temples => 1,
            Self::Pundits => 2,
        }
    }

    /// Table backing the collection
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Poojas => "poojas",
            Self::Temples => "temples",
            Self::Pundits => "pundits",
        }
    }

    /// Columns projected into a hit
    #[must_use]
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Poojas => &["id", "name", "description", "category"],
            Self::Temples => &["id", "name", "city", "state"],
            Self::Pundits => &["id", "name", "location", "specialization"],
        }
    }

    /// Text columns matched case-insensitively against the query
    #[must_use]
    pub const fn searched_columns(self) -> &'static [&'static str] {
        match self {
            Self::Poojas => &["name", "description", "category"],
            Self::Temples => &["name", "city", "state"],
            Self::Pundits => &["name", "location", "specialization"],
        }
    }

    /// Boolean column restricting lookups to live records
    #[must_use]
    pub const fn active_column(self) -> &'static str {
        "is_active"
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Common view over the three hit projections
pub trait SearchHit {
    /// Record identifier
    fn id(&self) -> &str;

    /// Name shown in the result list
    fn display_name(&self) -> &str;

    /// Values of [`Collection::searched_columns`], in the same order
    fn searched_fields(&self) -> [Option<&str>; 3];

    /// Case-insensitive "contains" over the searched fields
    ///
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.searched_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// A ritual matching the query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoojaHit {
    /// Record identifier
    pub id: String,
    /// Ritual name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
    /// Category such as "Graha Shanti"
    #[serde(default)]
    pub category: Option<String>,
}

impl PoojaHit {
    /// Creates a hit with only id and name set
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            category: None,
        }
    }

    /// Sets the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl SearchHit for PoojaHit {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn searched_fields(&self) -> [Option<&str>; 3] {
        [
            Some(self.name.as_str()),
            self.description.as_deref(),
            self.category.as_deref(),
        ]
    }
}

/// A temple matching the query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempleHit {
    /// Record identifier
    pub id: String,
    /// Temple name
    pub name: String,
    /// City the temple is in
    #[serde(default)]
    pub city: Option<String>,
    /// State the temple is in
    #[serde(default)]
    pub state: Option<String>,
}

impl TempleHit {
    /// Creates a hit with only id and name set
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            city: None,
            state: None,
        }
    }

    /// Sets city and state
    #[must_use]
    pub fn located(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self.state = Some(state.into());
        self
    }
}

impl SearchHit for TempleHit {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn searched_fields(&self) -> [Option<&str>; 3] {
        [
            Some(self.name.as_str()),
            self.city.as_deref(),
            self.state.as_deref(),
        ]
    }
}

/// A pundit matching the query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunditHit {
    /// Record identifier
    pub id: String,
    /// Pundit name
    pub name: String,
    /// Where the pundit practises
    #[serde(default)]
    pub location: Option<String>,
    /// Rituals the pundit specializes in
    #[serde(default)]
    pub specialization: Option<String>,
}

impl PunditHit {
    /// Creates a hit with only id and name set
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: None,
            specialization: None,
        }
    }

    /// Sets the location
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the specialization
    #[must_use]
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }
}

impl SearchHit for PunditHit {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn searched_fields(&self) -> [Option<&str>; 3] {
        [
            Some(self.name.as_str()),
            self.location.as_deref(),
            self.specialization.as_deref(),
        ]
    }
}

/// Hits from all three collections, each in backing-store order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching rituals
    pub poojas: Vec<PoojaHit>,
    /// Matching temples
    pub temples: Vec<TempleHit>,
    /// Matching pundits
    pub pundits: Vec<PunditHit>,
}

impl SearchResults {
    /// True iff any collection has a hit
    #[must_use]
    pub fn has_results(&self) -> bool {
        !self.poojas.is_empty() || !self.temples.is_empty() || !self.pundits.is_empty()
    }

    /// Total hits across collections
    #[must_use]
    pub fn len(&self) -> usize {
        self.poojas.len() + self.temples.len() + self.pundits.len()
    }

    /// True iff no collection has a hit
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_results()
    }

    /// Truncates every collection to `max` hits
    #[must_use]
    pub fn capped(mut self, max: usize) -> Self {
        self.poojas.truncate(max);
        self.temples.truncate(max);
        self.pundits.truncate(max);
        self
    }
}

/// Phase of the search state machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    /// Query too short; nothing shown
    #[default]
    Idle,
    /// Fan-out in flight
    Loading,
    /// Last fan-out completed
    Ready,
    /// Last fan-out failed
    Failed,
}

/// Full state of the search box
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    /// Latest raw input
    pub query: Query,
    /// Debounced query the current phase and results belong to
    pub active_query: Option<Query>,
    /// Token of the current fan-out; completions carrying another token are stale
    pub generation: u64,
    /// State machine phase
    pub phase: SearchPhase,
    /// Results of the last completed fan-out
    pub results: SearchResults,
    /// Error of the last completed fan-out
    pub error: Option<SearchError>,
    /// Collections whose lookup failed in the last fan-out
    pub failed_collections: Vec<Collection>,
    /// When the last fan-out completed
    pub updated_at: Option<DateTime<Utc>>,
}

impl SearchState {
    /// Creates an idle state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fan-out is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    /// Derived from the results on every call
    #[must_use]
    pub fn has_results(&self) -> bool {
        self.results.has_results()
    }

    /// Drops results and error and returns to `Idle`
    ///
    /// Bumps the generation so that any fan-out still in flight is discarded
    /// when it completes.
    pub fn reset(&mut self) {
        self.active_query = None;
        self.generation += 1;
        self.phase = SearchPhase::Idle;
        self.results = SearchResults::default();
        self.error = None;
        self.failed_collections.clear();
    }

    /// What the search box renders
    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            results: self.results.clone(),
            is_loading: self.is_loading(),
            error: self.error.as_ref().map(ToString::to_string),
            has_results: self.has_results(),
        }
    }
}

/// Caller-facing view of [`SearchState`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    /// Hits per collection
    pub results: SearchResults,
    /// Whether a fan-out is in flight
    pub is_loading: bool,
    /// Readable error of the last fan-out
    pub error: Option<String>,
    /// Whether any collection has a hit
    pub has_results: bool,
}
