//! # Pooja Search Testing
//!
//! Testing utilities for reducers built on `pooja-search-core`.
//!
//! This crate provides:
//! - A deterministic [`Clock`]
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Effect assertions
//! - Proptest strategies for search box input
//!
//! ## Example
//!
//! ```ignore
//! use pooja_search_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(SearchReducer::new())
//!     .with_env(test_environment())
//!     .given_state(SearchState::new())
//!     .when_action(SearchAction::query_changed("Ganesh"))
//!     .then_effects(|effects| assertions::assert_has_cancellable_effect(effects, DEBOUNCE))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use pooja_search_core::environment::Clock;

pub mod reducer_test;

/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use pooja_search_testing::mocks::FixedClock;
    /// use pooja_search_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Proptest strategies for search box input
pub mod properties {
    use proptest::prelude::*;

    /// Input whose trimmed length is below `min_len` characters
    ///
    /// Padded with arbitrary whitespace so trimming is exercised too.
    pub fn short_query(min_len: usize) -> impl Strategy<Value = String> {
        let max = min_len.saturating_sub(1);
        ("[ \t]{0,3}", proptest::collection::vec("[a-zA-Z\u{0900}-\u{097F}]", 0..=max), "[ \t]{0,3}")
            .prop_map(|(lead, chars, trail)| format!("{lead}{}{trail}", chars.concat()))
    }

    /// Input whose trimmed length is at least `min_len` characters
    pub fn searchable_query(min_len: usize) -> impl Strategy<Value = String> {
        proptest::collection::vec("[a-zA-Z\u{0900}-\u{097F}]", min_len..min_len + 12)
            .prop_map(|chars| chars.concat())
    }

    /// A burst of keystrokes, each a prefix of the final word
    pub fn typing_burst() -> impl Strategy<Value = Vec<String>> {
        "[a-z]{2,10}".prop_map(|word| {
            (1..=word.len())
                .map(|end| word[..end].to_string())
                .collect()
        })
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
