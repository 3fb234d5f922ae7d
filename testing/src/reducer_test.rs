//! Given-When-Then harness for reducers.
//!
//! A reducer is a plain function, so a test needs no runtime: seed a state,
//! reduce one or more actions against an environment, then inspect the final
//! state and the effects returned by the last action.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use pooja_search_core::{SmallVec, effect::Effect, reducer::Reducer};

/// Check run against the state after every action was reduced
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Check run against the effects of the last action
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Reducer test builder
///
/// # Example
///
/// ```ignore
/// use pooja_search_testing::{ReducerTest, assertions};
///
/// ReducerTest::new(SearchReducer::new())
///     .with_env(test_environment())
///     .given_state(SearchState::new())
///     .when_actions([
///         SearchAction::query_changed("Ganesh"),
///         SearchAction::query_changed("G"),
///     ])
///     .then_state(|state| assert!(!state.is_loading()))
///     .then_effects(|effects| assertions::assert_cancels(effects, DEBOUNCE))
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: Clone,
    A: Clone,
{
    /// Start a test for `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Environment passed to every reduction
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// State before the first action (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Queue an action (When)
    ///
    /// Actions are reduced in the order they were queued.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Queue several actions (When)
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Check the final state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Check the effects returned by the last action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Reduce the queued actions and run every check
    ///
    /// # Panics
    ///
    /// Panics if the state, environment or actions are missing, or if a
    /// check fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let mut effects = SmallVec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env);
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Assertions over returned effects
pub mod assertions {
    use pooja_search_core::effect::{Effect, EffectId};
    use std::time::Duration;

    /// Nothing to execute: no effects, or only `Effect::None`
    ///
    /// # Panics
    ///
    /// Panics if any effect does something.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Exactly `expected` effects
    ///
    /// # Panics
    ///
    /// Panics on a different count.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// At least one `Effect::Future`
    ///
    /// # Panics
    ///
    /// Panics if there is none.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }

    /// A cancellable effect registered under `id`
    ///
    /// # Panics
    ///
    /// Panics if there is none.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_cancellable_effect<A: std::fmt::Debug>(effects: &[Effect<A>], id: EffectId) {
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::Cancellable { id: found, .. } if *found == id)),
            "Expected a cancellable effect `{id}`, but found {effects:?}"
        );
    }

    /// A debounce under `id`: a cancellable delay of `duration` dispatching `action`
    ///
    /// # Panics
    ///
    /// Panics if there is no such effect.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_debounces<A>(effects: &[Effect<A>], id: EffectId, duration: Duration, action: &A)
    where
        A: std::fmt::Debug + PartialEq,
    {
        let found = effects.iter().any(|e| match e {
            Effect::Cancellable { id: found, effect } if *found == id => matches!(
                effect.as_ref(),
                Effect::Delay { duration: d, action: a } if *d == duration && **a == *action
            ),
            _ => false,
        });
        assert!(
            found,
            "Expected `{id}` to debounce {action:?} by {duration:?}, but found {effects:?}"
        );
    }

    /// An `Effect::Cancel(id)`
    ///
    /// # Panics
    ///
    /// Panics if `id` is not cancelled.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_cancels<A: std::fmt::Debug>(effects: &[Effect<A>], id: EffectId) {
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::Cancel(found) if *found == id)),
            "Expected `{id}` to be cancelled, but found {effects:?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pooja_search_core::effect::EffectId;
    use smallvec::smallvec;
    use std::time::Duration;

    const SAVE: EffectId = EffectId::new("draft.save");

    /// A draft that autosaves once typing pauses
    #[derive(Clone, Debug, Default)]
    struct Draft {
        text: String,
        saved: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum DraftAction {
        Edited(String),
        Discarded,
        SaveDue(String),
    }

    struct DraftReducer;

    struct DraftEnv {
        pause: Duration,
    }

    impl Reducer for DraftReducer {
        type State = Draft;
        type Action = DraftAction;
        type Environment = DraftEnv;

        fn reduce(
            &self,
            state: &mut Draft,
            action: DraftAction,
            env: &DraftEnv,
        ) -> SmallVec<[Effect<DraftAction>; 4]> {
            match action {
                DraftAction::Edited(text) => {
                    state.text.clone_from(&text);
                    smallvec![Effect::debounce(SAVE, env.pause, DraftAction::SaveDue(text))]
                },
                DraftAction::Discarded => {
                    state.text.clear();
                    smallvec![Effect::Cancel(SAVE)]
                },
                DraftAction::SaveDue(text) => {
                    state.saved = Some(text);
                    smallvec![Effect::None]
                },
            }
        }
    }

    fn env() -> DraftEnv {
        DraftEnv {
            pause: Duration::from_millis(250),
        }
    }

    #[test]
    fn edit_debounces_save() {
        ReducerTest::new(DraftReducer)
            .with_env(env())
            .given_state(Draft::default())
            .when_action(DraftAction::Edited("om".to_string()))
            .then_state(|draft| assert_eq!(draft.text, "om"))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_cancellable_effect(effects, SAVE);
                assertions::assert_debounces(
                    effects,
                    SAVE,
                    Duration::from_millis(250),
                    &DraftAction::SaveDue("om".to_string()),
                );
            })
            .run();
    }

    #[test]
    fn later_actions_see_earlier_state_and_only_last_effects_count() {
        ReducerTest::new(DraftReducer)
            .with_env(env())
            .given_state(Draft::default())
            .when_actions([
                DraftAction::Edited("om".to_string()),
                DraftAction::SaveDue("om".to_string()),
            ])
            .when_action(DraftAction::Discarded)
            .then_state(|draft| {
                assert!(draft.text.is_empty());
                assert_eq!(draft.saved.as_deref(), Some("om"));
            })
            .then_effects(|effects| assertions::assert_cancels(effects, SAVE))
            .run();
    }

    #[test]
    fn save_has_no_follow_up() {
        ReducerTest::new(DraftReducer)
            .with_env(env())
            .given_state(Draft::default())
            .when_action(DraftAction::SaveDue("namaste".to_string()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    #[should_panic(expected = "At least one action")]
    fn requires_an_action() {
        ReducerTest::new(DraftReducer)
            .with_env(env())
            .given_state(Draft::default())
            .run();
    }

    #[test]
    #[should_panic(expected = "to debounce")]
    fn debounce_assertion_checks_the_delay() {
        let effects = [Effect::debounce(SAVE, Duration::from_millis(10), DraftAction::Discarded)];
        assertions::assert_debounces(&effects, SAVE, Duration::from_millis(20), &DraftAction::Discarded);
    }

    #[test]
    #[should_panic(expected = "to be cancelled")]
    fn cancel_assertion_checks_the_id() {
        assertions::assert_cancels::<DraftAction>(
            &[Effect::Cancel(EffectId::new("other"))],
            SAVE,
        );
    }

    #[test]
    fn empty_and_none_both_count_as_no_effects() {
        assertions::assert_no_effects::<DraftAction>(&[Effect::None]);
        assertions::assert_no_effects::<DraftAction>(&[]);
        assertions::assert_effects_count::<DraftAction>(&[], 0);
    }
}
