//! # Venue Runtime
//!
//! The [`Store`] owns a reducer's state and executes the effects it returns.
//!
//! ## Flow
//!
//! ```text
//! send(action) → reducer.reduce(state, action, env) → effects
//!                        ▲                               │
//!                        └──── action produced by effect ┘
//! ```
//!
//! Reducing happens under a lock, one action at a time. Effects run on the
//! tokio runtime; every action an effect produces is broadcast to observers
//! and then fed back into the reducer. Nothing is retried: a failed backend
//! call is expected to come back as an error action.
//!
//! ## Example
//!
//! ```ignore
//! use venue_runtime::Store;
//!
//! let store = Store::new(ReservationState::default(), ReservationReducer::new(), env);
//! store.send(ReservationAction::LoadSnapshot).await?;
//! let count = store.state(|s| s.reservations.len());
//! ```

use futures::future::{join_all, BoxFuture};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use venue_core::{effect::Effect, reducer::Reducer};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// No matching action arrived before the deadline
        #[error("Timed out after {0:?} waiting for a result action")]
        Timeout(std::time::Duration),

        /// The action broadcast channel was closed
        #[error("Action channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Capacity of the action broadcast channel.
const BROADCAST_CAPACITY: usize = 64;

/// Decrements the pending-effect counter when dropped, so a panicking effect
/// task still lets `wait_idle` make progress.
struct PendingGuard(watch::Sender<usize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.send_modify(|pending| *pending = pending.saturating_sub(1));
    }
}

/// The Store - runtime for a single reducer
///
/// Cloning a store is cheap; clones share state, reducer and environment.
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: Arc<R>,
    environment: Arc<E>,
    action_broadcast: broadcast::Sender<A>,
    pending: watch::Sender<usize>,
    shutdown: Arc<AtomicBool>,
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
            action_broadcast: self.action_broadcast.clone(),
            pending: self.pending.clone(),
            shutdown: Arc::clone(&self.shutdown),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Clone + Send + std::fmt::Debug + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        let (action_broadcast, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (pending, _) = watch::channel(0);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer: Arc::new(reducer),
            environment: Arc::new(environment),
            action_broadcast,
            pending,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Send an action to the store.
    ///
    /// The action is reduced immediately; its effects are started in the
    /// background. Use [`Store::send_and_wait_for`] or [`Store::wait_idle`]
    /// to observe their outcome.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Store::shutdown`].
    #[allow(clippy::unused_async)]
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<(), StoreError> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(StoreError::ShutdownInProgress);
        }
        self.dispatch(action);
        Ok(())
    }

    /// Send an action and wait for the first effect-produced action matching
    /// `predicate`.
    ///
    /// Subscribes before sending, so a fast effect cannot be missed.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: nothing matched before `timeout`
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

        let wait = async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        };

        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| StoreError::Timeout(timeout))?
    }

    /// Subscribe to actions produced by effects.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read a value out of the current state.
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&*state)
    }

    /// Number of effects still running.
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        *self.pending.borrow()
    }

    /// Wait until no effects are running, including effects started by
    /// actions that earlier effects fed back.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running after
    /// `timeout`.
    pub async fn wait_idle(&self, timeout: Duration) -> Result<(), StoreError> {
        let mut rx = self.pending.subscribe();
        tokio::time::timeout(timeout, rx.wait_for(|pending| *pending == 0))
            .await
            .map_err(|_| StoreError::Timeout(timeout))?
            .map(|_| ())
            .map_err(|_| StoreError::ChannelClosed)
    }

    /// Stop accepting new actions and wait for running effects to finish.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects outlive `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.shutdown.store(true, Ordering::SeqCst);
        tracing::info!(pending = self.pending_effects(), "Store shutting down");
        self.wait_idle(timeout).await
    }

    /// Reduce one action and start its effects.
    fn dispatch(&self, action: A) {
        tracing::debug!(?action, "Reducing action");
        metrics::counter!("store.actions.reduced").increment(1);

        let effects = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            self.reducer.reduce(&mut *state, action, &self.environment)
        };

        for effect in effects {
            self.execute(effect);
        }
    }

    /// Start an effect in the background.
    fn execute(&self, effect: Effect<A>) {
        if effect.is_none() {
            tracing::trace!("Skipping Effect::None");
            metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            return;
        }

        self.pending.send_modify(|pending| *pending += 1);
        let guard = PendingGuard(self.pending.clone());
        let store = self.clone();

        tokio::spawn(async move {
            let _guard = guard;
            store.run(effect).await;
        });
    }

    /// Run an effect to completion, feeding produced actions back.
    fn run(&self, effect: Effect<A>) -> BoxFuture<'static, ()> {
        let store = self.clone();
        Box::pin(async move {
            match effect {
                Effect::None => {},
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    if let Some(action) = fut.await {
                        store.feed_back(action);
                    } else {
                        tracing::trace!("Effect::Future completed with no action");
                    }
                },
                Effect::Delay { duration, action } => {
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    tokio::time::sleep(duration).await;
                    store.feed_back(*action);
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    join_all(effects.into_iter().map(|effect| store.run(effect))).await;
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                    for effect in effects {
                        store.run(effect).await;
                    }
                },
            }
        })
    }

    fn feed_back(&self, action: A) {
        // No receivers is fine: observers are optional.
        let _ = self.action_broadcast.send(action.clone());

        if self.shutdown.load(Ordering::SeqCst) {
            tracing::warn!(?action, "Dropping effect action during shutdown");
            return;
        }
        self.dispatch(action);
    }
}
