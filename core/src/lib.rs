//! # Pooja Search Core
//!
//! Core traits and types for the search aggregator.
//!
//! The aggregator is written as a reducer: a pure function that takes the
//! current state, an action, and injected dependencies, mutates the state in
//! place and returns effect descriptions. The runtime crate executes those
//! effects and feeds the actions they produce back into the reducer.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (user input and effect results)
//! - **Reducer**: Pure function `(State, Action, Environment) → Effects`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```ignore
//! use pooja_search_core::*;
//!
//! impl Reducer for SearchReducer {
//!     type State = SearchState;
//!     type Action = SearchAction;
//!     type Environment = SearchEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut SearchState,
//!         action: SearchAction,
//!         env: &SearchEnvironment,
//!     ) -> SmallVec<[Effect<SearchAction>; 4]> {
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → Effects`.
/// They hold all the decision making and are deterministic and testable
/// without a runtime.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Identifier for a cancellable effect
    ///
    /// At most one effect per id runs at a time: starting a new cancellable
    /// effect with an id that is still running aborts the older one.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EffectId(&'static str);

    impl EffectId {
        /// Create an effect id from a static name
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(name)
        }

        /// The name this id was created with
        #[must_use]
        pub const fn as_str(&self) -> &'static str {
            self.0
        }
    }

    impl fmt::Display for EffectId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Delayed action
        ///
        /// The action is always dispatched from a spawned task, even when
        /// `duration` is zero.
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run `effect` under `id`, replacing any effect still running under it
        Cancellable {
            /// Cancellation key
            id: EffectId,
            /// The wrapped effect
            effect: Box<Effect<Action>>,
        },

        /// Abort the effect running under this id, if any
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> fmt::Debug for Effect<Action>
    where
        Action: fmt::Debug,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Dispatch `action` once `duration` passes without another
        /// debounce under the same `id`
        ///
        /// Each call restarts the timer: the runtime aborts the pending
        /// delay registered under `id` before starting the new one.
        ///
        /// # Example
        ///
        /// ```
        /// use pooja_search_core::effect::{Effect, EffectId};
        /// use std::time::Duration;
        ///
        /// const TYPING: EffectId = EffectId::new("typing");
        ///
        /// let effect = Effect::debounce(TYPING, Duration::from_millis(300), "settled");
        /// assert!(matches!(effect, Effect::Cancellable { id, .. } if id == TYPING));
        /// ```
        #[must_use]
        pub fn debounce(id: EffectId, duration: Duration, action: Action) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(Effect::Delay {
                    duration,
                    action: Box::new(action),
                }),
            }
        }

        /// Whether this effect does nothing when executed
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
