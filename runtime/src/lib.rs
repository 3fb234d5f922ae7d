//! # Pooja Search Runtime
//!
//! Runtime implementation for the search aggregator.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation Registry**: Aborts superseded `Effect::Cancellable` tasks (debounce timers)
//!
//! ## Example
//!
//! ```ignore
//! use pooja_search_runtime::Store;
//!
//! let store = Store::new(SearchState::default(), SearchReducer::new(), environment);
//!
//! store.send(SearchAction::QueryChanged { query: "Ganesh".into() }).await?;
//!
//! let snapshot = store.state(SearchState::snapshot).await;
//! ```

use pooja_search_core::{
    effect::{Effect, EffectId},
    reducer::Reducer,
};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::task::AbortHandle;

/// Prometheus metrics for observability
pub mod metrics;

pub use error::StoreError;
pub use store::Store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// one action. Effects started by feedback actions are not included.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(SearchAction::Retry).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (handle, _tracking) = Self::new();
        handle
    }

    /// Number of tracked effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all tracked effects to complete
    ///
    /// Aborted effects count as complete.
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect counter shared between an [`EffectHandle`] and the tasks it tracks
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    /// Tracking nobody waits on (effects nested inside a cancellable task)
    fn detached() -> Self {
        EffectHandle::new().1
    }

    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Runs on completion, on panic, and when the task is aborted.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Internal: a cancellable task currently registered under an [`EffectId`]
struct Running {
    token: u64,
    abort: AbortHandle,
}

type Registry = Arc<Mutex<HashMap<EffectId, Running>>>;

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicU64, AtomicUsize, DecrementGuard, Duration,
        Effect, EffectHandle, EffectId, EffectTracking, Future, HashMap, Mutex, Ordering, Pin,
        PoisonError, Reducer, Registry, Running, RwLock,
    };
    use crate::error::StoreError;
    use tokio::sync::broadcast;
    use tokio::task::AbortHandle;

    type DriveFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        cancellables: Registry,
        next_token: Arc<AtomicU64>,
        /// Every action produced by an effect is broadcast here once it has
        /// been reduced.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                cancellables: Arc::clone(&self.cancellables),
                next_token: Arc::clone(&self.next_token),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast channel holds 16 actions; use
        /// [`Store::with_broadcast_capacity`] for busier subscribers.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new store with a custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                cancellables: Arc::new(Mutex::new(HashMap::new())),
                next_token: Arc::new(AtomicU64::new(0)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects in spawned tasks
        ///
        /// `send()` returns after starting effect execution, not completion.
        /// Concurrent calls serialize at the reducer.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.actions.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect, &tracking);
            }

            Ok(handle)
        }

        /// Send an action and wait for a matching action produced by an effect
        ///
        /// Subscribes before sending, so a fast effect cannot be missed.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action before `timeout`
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged, {} actions skipped", skipped);
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Each action is broadcast after it has been reduced. Actions sent
        /// directly via [`Store::send`] are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let snapshot = store.state(SearchState::snapshot).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Abort the cancellable effect registered under `id`
        ///
        /// Returns `true` if a running effect was aborted.
        pub fn cancel(&self, id: &EffectId) -> bool {
            let running = self
                .cancellables
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(id);

            running.is_some_and(|running| {
                running.abort.abort();
                metrics::counter!("store.effects.cancelled").increment(1);
                tracing::trace!(effect_id = %id, "Cancelled effect");
                true
            })
        }

        /// Number of effects currently running
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown
        ///
        /// Rejects new actions, aborts registered cancellable effects, then
        /// waits for the remaining effects.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let running: Vec<Running> = self
                .cancellables
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .drain()
                .map(|(_, running)| running)
                .collect();
            for running in running {
                running.abort.abort();
            }

            let start = tokio::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout: {} effects still running", pending);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Execute an effect, tracking spawned work against `tracking`
        ///
        /// - `None`: No-op
        /// - `Future`: Spawns the computation, feeds back the resulting action if `Some`
        /// - `Delay`: Spawns a sleep, then feeds back the action
        /// - `Parallel`: Executes every effect concurrently
        /// - `Cancellable`: Aborts the task under the same id, then spawns the inner effect
        /// - `Cancel`: Aborts the task under the id
        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let store = self.clone();
                    self.spawn_tracked(tracking, async move {
                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    let store = self.clone();
                    self.spawn_tracked(tracking, async move {
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    });
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking);
                    }
                },
                Effect::Cancellable { id, effect } => {
                    tracing::trace!(effect_id = %id, "Executing Effect::Cancellable");
                    metrics::counter!("store.effects.executed", "type" => "cancellable").increment(1);
                    self.spawn_cancellable(id, *effect, tracking);
                },
                Effect::Cancel(id) => {
                    metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);
                    self.cancel(&id);
                },
            }
        }

        /// Register and spawn `effect` under `id`, aborting its predecessor
        fn spawn_cancellable(&self, id: EffectId, effect: Effect<A>, tracking: &EffectTracking) {
            let token = self.next_token.fetch_add(1, Ordering::Relaxed);
            let registry = Arc::clone(&self.cancellables);
            let drive = self.drive(effect);

            // Holding the registry lock across the spawn keeps a fast task
            // from deregistering before it is registered.
            let mut running = self
                .cancellables
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            let abort = self.spawn_tracked(tracking, async move {
                drive.await;
                let mut running = registry.lock().unwrap_or_else(PoisonError::into_inner);
                if running.get(&id).is_some_and(|r| r.token == token) {
                    running.remove(&id);
                }
            });

            if let Some(previous) = running.insert(id, Running { token, abort }) {
                previous.abort.abort();
                metrics::counter!("store.effects.cancelled").increment(1);
                tracing::trace!(effect_id = %id, "Superseded running effect");
            }
        }

        /// Run an effect to completion inside the current task
        fn drive(&self, effect: Effect<A>) -> DriveFuture {
            let store = self.clone();
            Box::pin(async move {
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => {
                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        }
                    },
                    Effect::Delay { duration, action } => {
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    },
                    Effect::Parallel(effects) => {
                        futures::future::join_all(effects.into_iter().map(|e| store.drive(e)))
                            .await;
                    },
                    nested @ (Effect::Cancellable { .. } | Effect::Cancel(_)) => {
                        store.execute_effect(nested, &EffectTracking::detached());
                    },
                }
            })
        }

        /// Spawn a tracked task; the counters drop back even if it is aborted
        fn spawn_tracked<F>(&self, tracking: &EffectTracking, task: F) -> AbortHandle
        where
            F: Future<Output = ()> + Send + 'static,
        {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);

            let guard = DecrementGuard(tracking.clone());
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

            tokio::spawn(async move {
                let _guard = guard;
                let _pending_guard = pending_guard;
                task.await;
            })
            .abort_handle()
        }

        /// Reduce an effect-produced action, then broadcast it
        ///
        /// Rejected actions are not broadcast.
        async fn feed_back(&self, action: A) {
            if let Err(error) = self.send(action.clone()).await {
                tracing::debug!(%error, "Dropped feedback action");
                return;
            }

            // Observers see an action only once the state reflects it
            let _ = self.action_broadcast.send(action);
        }
    }
}
