//! Activation Observer.
//!
//! Browsers sometimes wake the tab to the right of the one the user switches
//! to. On every activation event the observer looks at that neighbor and, if
//! the host still reports it as discarded, asks the host to reload it so the
//! tab does not stay half-resident.
//!
//! Each observation runs as its own task on the tokio runtime. Observations
//! are tied to the lifecycle generation that was current when they started;
//! once `disable()` moves the generation on, a pending observation finishes
//! without reloading anything.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::host::{ActivationListener, SubscriptionId, TabHost};
use crate::types::errors::HostError;
use crate::types::tab::{ActivationEvent, TabId, TabQuery};

/// Finished observations kept for `settle()` after their task has been reaped.
const RETAINED_OUTCOMES: usize = 64;

/// What a single observation pass ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// The discarded neighbor was asked to reload.
    Reloaded(TabId),
    /// No discarded tab sits right of the activated tab.
    NoDiscardedNeighbor,
    /// The activated tab, or the reload target, no longer exists.
    TabGone,
    /// The focused window has no active tab (initial pass only).
    NoActiveTab,
    /// The observer was disabled while this pass was in flight.
    Superseded,
    /// A host call failed; the pass was dropped.
    Failed(String),
}

/// Trait defining the observer lifecycle.
pub trait ActivationObserverTrait {
    fn enable(&self);
    fn disable(&self);
    fn is_enabled(&self) -> bool;
}

/// Everything one observation task needs. Owns no reference back to the observer.
struct Pass {
    host: Arc<dyn TabHost>,
    lifecycle: Arc<AtomicU64>,
    generation: u64,
}

impl Pass {
    fn is_current(&self) -> bool {
        self.lifecycle.load(Ordering::SeqCst) == self.generation
    }

    async fn observe(&self, event: ActivationEvent) -> Observation {
        let tab = match self.host.get_tab(event.tab_id).await {
            Ok(tab) => tab,
            Err(HostError::TabNotFound(_)) => {
                debug!("activated tab vanished before lookup");
                return Observation::TabGone;
            }
            Err(err) => {
                warn!(error = %err, "tab lookup failed");
                return Observation::Failed(err.to_string());
            }
        };

        if !self.is_current() {
            debug!(generation = self.generation, "observer disabled, skipping query");
            return Observation::Superseded;
        }

        let query = TabQuery::discarded_neighbor(event.window_id, &tab);
        let neighbors = match self.host.query_tabs(&query).await {
            Ok(tabs) => tabs,
            Err(err) => {
                warn!(error = %err, "neighbor query failed");
                return Observation::Failed(err.to_string());
            }
        };

        let Some(next) = neighbors.first() else {
            debug!(index = tab.index + 1, "no discarded neighbor");
            return Observation::NoDiscardedNeighbor;
        };

        if !self.is_current() {
            debug!(generation = self.generation, next = next.id, "observer disabled, skipping reload");
            return Observation::Superseded;
        }

        match self.host.reload_tab(next.id).await {
            Ok(()) => {
                info!(next = next.id, index = next.index, "releasing discard of next tab");
                Observation::Reloaded(next.id)
            }
            Err(HostError::TabNotFound(id)) => {
                debug!(next = id, "reload target closed before reload");
                Observation::TabGone
            }
            Err(err) => {
                warn!(next = next.id, error = %err, "reload failed");
                Observation::Failed(err.to_string())
            }
        }
    }

    /// Observation for whatever tab is active in the focused window.
    async fn observe_current(&self) -> Observation {
        let active = match self
            .host
            .query_tabs(&TabQuery::active_in_current_window())
            .await
        {
            Ok(tabs) => tabs,
            Err(err) => {
                warn!(error = %err, "active tab query failed");
                return Observation::Failed(err.to_string());
            }
        };
        match active.first() {
            Some(tab) => {
                let event = ActivationEvent::from(tab);
                self.observe(event).await
            }
            None => {
                debug!("focused window has no active tab");
                Observation::NoActiveTab
            }
        }
    }
}

struct Shared {
    host: Arc<dyn TabHost>,
    runtime: Handle,
    lifecycle: Arc<AtomicU64>,
    tasks: Mutex<JoinSet<Observation>>,
    /// Tasks moved out of `tasks` by a running `settle()`.
    draining: AtomicUsize,
    completed: Mutex<Vec<Observation>>,
}

/// Keeps `Shared::draining` in step with a set taken by `settle()`, including
/// when the settling future is dropped early.
struct Draining<'a> {
    counter: &'a AtomicUsize,
    left: usize,
}

impl<'a> Draining<'a> {
    fn start(counter: &'a AtomicUsize, left: usize) -> Self {
        counter.fetch_add(left, Ordering::SeqCst);
        Self { counter, left }
    }

    fn finish_one(&mut self) {
        self.left = self.left.saturating_sub(1);
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Drop for Draining<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(self.left, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn pass(&self, generation: u64) -> Pass {
        Pass {
            host: Arc::clone(&self.host),
            lifecycle: Arc::clone(&self.lifecycle),
            generation,
        }
    }

    fn spawn_observation(&self, event: Option<ActivationEvent>, generation: u64) {
        let pass = self.pass(generation);
        let span = tracing::debug_span!(
            "observe",
            observation = %Uuid::new_v4(),
            generation,
            tab_id = ?event.map(|e| e.tab_id),
            window_id = ?event.map(|e| e.window_id),
        );
        let fut = async move {
            match event {
                Some(event) => pass.observe(event).await,
                None => pass.observe_current().await,
            }
        };

        let mut tasks = lock(&self.tasks);
        while let Some(done) = tasks.try_join_next() {
            self.retain(done);
        }
        tasks.spawn_on(fut.instrument(span), &self.runtime);
    }

    fn retain(&self, done: Result<Observation, tokio::task::JoinError>) {
        let outcome = match done {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "observation task did not complete");
                Observation::Failed(err.to_string())
            }
        };
        let mut completed = lock(&self.completed);
        if completed.len() == RETAINED_OUTCOMES {
            completed.remove(0);
        }
        completed.push(outcome);
    }
}

/// Listener registered with the host. Only forwards events for the
/// generation it was registered under.
struct Forwarder {
    shared: Weak<Shared>,
    generation: u64,
}

impl ActivationListener for Forwarder {
    fn on_activated(&self, event: ActivationEvent) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        if shared.lifecycle.load(Ordering::SeqCst) != self.generation {
            debug!(tab_id = event.tab_id, "stale listener ignored activation");
            return;
        }
        shared.spawn_observation(Some(event), self.generation);
    }
}

/// Watches tab activations and reloads a discarded right-hand neighbor.
pub struct ActivationObserver {
    shared: Arc<Shared>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl ActivationObserver {
    /// Observation tasks are spawned onto `runtime`.
    pub fn new(host: Arc<dyn TabHost>, runtime: Handle) -> Self {
        Self {
            shared: Arc::new(Shared {
                host,
                runtime,
                lifecycle: Arc::new(AtomicU64::new(0)),
                tasks: Mutex::new(JoinSet::new()),
                draining: AtomicUsize::new(0),
                completed: Mutex::new(Vec::new()),
            }),
            subscription: Mutex::new(None),
        }
    }

    /// Current lifecycle generation; moves on every enable and disable.
    pub fn generation(&self) -> u64 {
        self.shared.lifecycle.load(Ordering::SeqCst)
    }

    /// Run one observation inline under the current generation.
    pub async fn observe(&self, event: ActivationEvent) -> Observation {
        self.shared.pass(self.generation()).observe(event).await
    }

    /// Number of observation tasks not yet collected, including those a
    /// concurrent `settle()` is waiting on.
    pub fn pending(&self) -> usize {
        lock(&self.shared.tasks).len() + self.shared.draining.load(Ordering::SeqCst)
    }

    /// Wait for every outstanding observation and return all outcomes not yet
    /// collected, oldest first.
    pub async fn settle(&self) -> Vec<Observation> {
        loop {
            let mut tasks = std::mem::take(&mut *lock(&self.shared.tasks));
            if tasks.is_empty() {
                break;
            }
            let mut draining = Draining::start(&self.shared.draining, tasks.len());
            while let Some(done) = tasks.join_next().await {
                draining.finish_one();
                self.shared.retain(done);
            }
        }
        std::mem::take(&mut *lock(&self.shared.completed))
    }
}

impl ActivationObserverTrait for ActivationObserver {
    /// Subscribe to activation events and run one pass for the focused
    /// window's active tab. No-op while already enabled.
    fn enable(&self) {
        let mut subscription = lock(&self.subscription);
        if subscription.is_some() {
            debug!("observer already enabled");
            return;
        }

        let generation = self.shared.lifecycle.fetch_add(1, Ordering::SeqCst) + 1;
        let forwarder = Arc::new(Forwarder {
            shared: Arc::downgrade(&self.shared),
            generation,
        });
        *subscription = Some(self.shared.host.subscribe(forwarder));
        info!(generation, "activation observer enabled");

        self.shared.spawn_observation(None, generation);
    }

    /// Unsubscribe. Observations already in flight finish without reloading.
    fn disable(&self) {
        let mut subscription = lock(&self.subscription);
        let Some(id) = subscription.take() else {
            return;
        };
        let generation = self.shared.lifecycle.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.shared.host.unsubscribe(id) {
            warn!(subscription = id, "host did not know observer subscription");
        }
        info!(generation, "activation observer disabled");
    }

    fn is_enabled(&self) -> bool {
        lock(&self.subscription).is_some()
    }
}

impl Drop for ActivationObserver {
    fn drop(&mut self) {
        self.disable();
    }
}
