//! # Redux Todo Runtime
//!
//! Runtime implementation for the redux-todo store.
//!
//! This crate provides the Store runtime that coordinates reducer execution,
//! publishes immutable state snapshots and runs effects.
//!
//! ## Core Components
//!
//! - **Store**: Holds the current state snapshot and applies the reducer
//! - **Subscription**: Listener registration, removed on drop
//! - **Effect Executor**: Runs effect descriptions and feeds actions back to the reducer
//!
//! ## Example
//!
//! ```ignore
//! use redux_todo_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let _subscription = store.subscribe(|state| println!("{state:?}"));
//!
//! store.dispatch(Action::DoSomething).await?;
//!
//! let snapshot = store.snapshot().await;
//! ```

use redux_todo_core::{effect::Effect, reducer::Reducer};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::RwLock;

/// Metric names and descriptions for the store
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// A task join error occurred during parallel effect execution
        ///
        /// This typically means a spawned task panicked.
        #[error("Task failed during parallel execution: {0}")]
        TaskJoinError(#[from] tokio::task::JoinError),

        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `dispatch()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Configuration for a [`Store`]
///
/// # Example
///
/// ```
/// use redux_todo_runtime::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_action_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
/// assert_eq!(config.action_broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Buffer size of the action broadcast channel
    pub action_broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(action_broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            action_broadcast_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the action broadcast capacity
    ///
    /// A capacity of zero is raised to one when the store is built.
    #[must_use]
    pub const fn with_action_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.action_broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            action_broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Listener invoked with every new state snapshot
type Listener<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;

/// Registered listeners, keyed by subscription id
struct Listeners<S> {
    next_id: u64,
    entries: Vec<(u64, Listener<S>)>,
}

impl<S> Listeners<S> {
    const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

/// Handle returned by [`Store::subscribe`]
///
/// The listener stays registered for as long as this handle is alive.
/// Dropping it, or calling [`Subscription::unsubscribe`], removes the listener.
#[must_use = "dropping the subscription unsubscribes the listener"]
pub struct Subscription<S> {
    id: u64,
    listeners: Weak<Mutex<Listeners<S>>>,
}

impl<S> Subscription<S> {
    /// Remove the listener from the store
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Returns `true` while the listener is still registered
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.listeners.upgrade().is_some_and(|listeners| {
            listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .iter()
                .any(|(id, _)| *id == self.id)
        })
    }
}

impl<S> Drop for Subscription<S> {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .retain(|(id, _)| *id != self.id);
            tracing::trace!(subscription = self.id, "Listener unsubscribed");
        }
    }
}

impl<S> std::fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        metrics as names, Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, Duration, Effect,
        Listener, Listeners, Mutex, Ordering, PoisonError, Reducer, RwLock, StoreConfig,
        StoreError, Subscription,
    };
    use futures::future::{join_all, BoxFuture};
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. The current state, as an immutable `Arc<S>` snapshot
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Subscribers notified with every new snapshot
    /// 5. Effect execution (with feedback loop)
    ///
    /// Cloning a store is cheap; clones share state, subscribers and effects.
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
        state: Arc<RwLock<Arc<S>>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        listeners: Arc<Mutex<Listeners<S>>>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Every dispatched action, including those produced by effects
        action_broadcast: broadcast::Sender<A>,
        config: StoreConfig,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        S: Clone + Send + Sync + 'static,
        A: Clone + Send + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with a custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            names::describe_store_metrics();
            let (action_broadcast, _) = broadcast::channel(config.action_broadcast_capacity.max(1));

            tracing::debug!(
                action_broadcast_capacity = config.action_broadcast_capacity,
                "Store created"
            );

            Self {
                state: Arc::new(RwLock::new(Arc::new(initial_state))),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                listeners: Arc::new(Mutex::new(Listeners::new())),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
                config,
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// Dispatch an action to the store
        ///
        /// 1. Acquires the write lock, so actions are reduced one at a time
        /// 2. Clones the current snapshot and runs the reducer on the copy
        /// 3. Publishes the result as the new snapshot
        /// 4. Notifies subscribers with the new snapshot, in dispatch order
        /// 5. Starts the returned effects on background tasks
        ///
        /// Snapshots handed out earlier are never modified.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic propagates and the current
        /// snapshot is left untouched.
        #[tracing::instrument(skip(self, action), name = "store_dispatch")]
        pub async fn dispatch(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!(names::ACTIONS_REJECTED).increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!(names::ACTIONS_TOTAL).increment(1);

            // No receivers is the common case
            let _ = self.action_broadcast.send(action.clone());

            let effects = {
                let mut current = self.state.write().await;
                tracing::trace!("Acquired write lock on state");

                let mut next = (**current).clone();
                let effects = tracing::debug_span!("reducer_execution").in_scope(|| {
                    let start = std::time::Instant::now();
                    let effects = self.reducer.reduce(&mut next, action, &self.environment);
                    metrics::histogram!(names::REDUCER_DURATION)
                        .record(start.elapsed().as_secs_f64());
                    effects
                });

                let snapshot = Arc::new(next);
                *current = Arc::clone(&snapshot);
                self.notify(&snapshot);

                effects
            };

            tracing::trace!("Reducer returned {} effects", effects.len());
            // Note: Precision loss acceptable for metrics (effect counts < 2^52)
            #[allow(clippy::cast_precision_loss)]
            metrics::histogram!(names::EFFECTS_COUNT).record(effects.len() as f64);

            for effect in effects {
                self.execute_effect(effect);
            }

            Ok(())
        }

        /// Current state snapshot
        ///
        /// The returned value is immutable; later dispatches publish new
        /// snapshots instead of modifying this one.
        pub async fn snapshot(&self) -> Arc<S> {
            Arc::clone(&*self.state.read().await)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let todo_count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&**state)
        }

        /// Register a listener for new state snapshots
        ///
        /// The listener runs synchronously inside `dispatch`, after the new
        /// snapshot is published and before `dispatch` returns. It must not
        /// block.
        pub fn subscribe<F>(&self, listener: F) -> Subscription<S>
        where
            F: Fn(&Arc<S>) + Send + Sync + 'static,
        {
            let listener: Listener<S> = Arc::new(listener);
            let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, listener));
            tracing::trace!(subscription = id, "Listener subscribed");

            Subscription {
                id,
                listeners: Arc::downgrade(&self.listeners),
            }
        }

        /// Number of registered listeners
        #[must_use]
        pub fn subscriber_count(&self) -> usize {
            self.listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .len()
        }

        /// Subscribe to every action dispatched to this store
        ///
        /// Receivers that fall more than `action_broadcast_capacity` actions
        /// behind observe `RecvError::Lagged`.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Gracefully shut down the store
        ///
        /// Stops accepting actions, then waits for running effects.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still
        /// running when `timeout` elapses.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(
                        pending_effects = pending,
                        "Shutdown timeout: {} effects still running", pending
                    );
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Shut down using the configured default timeout
        ///
        /// # Errors
        ///
        /// See [`Store::shutdown`].
        pub async fn shutdown_default(&self) -> Result<(), StoreError> {
            self.shutdown(self.config.default_shutdown_timeout).await
        }

        fn notify(&self, snapshot: &Arc<S>) {
            // Copy listeners out so a listener may drop its own subscription
            let listeners: Vec<Listener<S>> = self
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();

            for listener in &listeners {
                listener(snapshot);
            }

            metrics::counter!(names::NOTIFICATIONS_TOTAL).increment(listeners.len() as u64);
        }

        /// Start an effect on a background task
        ///
        /// Effects are fire-and-forget. A panic inside an effect is contained
        /// in its task and never reaches the store.
        fn execute_effect(&self, effect: Effect<A>) {
            if effect.is_none() {
                tracing::trace!("Skipping Effect::None");
                return;
            }

            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));
            let store = self.clone();

            tokio::spawn(async move {
                let _pending_guard = pending_guard;
                store.run_effect(effect).await;
            });
        }

        fn run_effect(&self, effect: Effect<A>) -> BoxFuture<'static, ()> {
            let store = self.clone();

            Box::pin(async move {
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => {
                        metrics::counter!(names::EFFECTS_EXECUTED, "type" => "future").increment(1);
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action");
                            store.feed_back(action).await;
                        }
                    },
                    Effect::Delay { duration, action } => {
                        metrics::counter!(names::EFFECTS_EXECUTED, "type" => "delay").increment(1);
                        tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    },
                    Effect::Parallel(effects) => {
                        metrics::counter!(names::EFFECTS_EXECUTED, "type" => "parallel").increment(1);
                        let tasks: Vec<_> = effects
                            .into_iter()
                            .map(|effect| tokio::spawn(store.run_effect(effect)))
                            .collect();

                        for result in join_all(tasks).await {
                            if let Err(join_error) = result {
                                let error = StoreError::from(join_error);
                                tracing::error!(%error, "Parallel effect failed");
                            }
                        }
                    },
                    Effect::Sequential(effects) => {
                        metrics::counter!(names::EFFECTS_EXECUTED, "type" => "sequential").increment(1);
                        let count = effects.len();
                        for (idx, effect) in effects.into_iter().enumerate() {
                            tracing::trace!("Executing sequential effect {} of {}", idx + 1, count);
                            store.run_effect(effect).await;
                        }
                    },
                }
            })
        }

        async fn feed_back(&self, action: A) {
            if let Err(error) = self.dispatch(action).await {
                tracing::warn!(%error, "Dropped action produced by effect");
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                listeners: Arc::clone(&self.listeners),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
                config: self.config.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
