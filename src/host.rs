//! Capability surface the host browser exposes to the core.
//!
//! The host owns all tab state. The core only reads it, asks for reloads and
//! listens to activation events.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::types::errors::HostError;
use crate::types::tab::{ActivationEvent, Tab, TabId, TabQuery};

/// Handle returned by [`TabHost::subscribe`], used to unsubscribe later.
pub type SubscriptionId = u64;

/// Receives activation events in the order the host emits them.
pub trait ActivationListener: Send + Sync {
    fn on_activated(&self, event: ActivationEvent);
}

/// Trait defining the host browser's tab interface.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Resolves a tab, `HostError::TabNotFound` if it no longer exists.
    async fn get_tab(&self, tab_id: TabId) -> Result<Tab, HostError>;
    /// Tabs matching `query`, ordered by window then index.
    async fn query_tabs(&self, query: &TabQuery) -> Result<Vec<Tab>, HostError>;
    async fn reload_tab(&self, tab_id: TabId) -> Result<(), HostError>;
    fn subscribe(&self, listener: Arc<dyn ActivationListener>) -> SubscriptionId;
    /// Returns false if `id` was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

struct Registry {
    next_id: SubscriptionId,
    listeners: Vec<(SubscriptionId, Arc<dyn ActivationListener>)>,
}

/// Subscriber list shared by host implementations.
pub struct ListenerRegistry {
    inner: Mutex<Registry>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Registry {
                next_id: 1,
                listeners: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, listener: Arc<dyn ActivationListener>) -> SubscriptionId {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, listener));
        id
    }

    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut registry = self.lock();
        let before = registry.listeners.len();
        registry.listeners.retain(|(sid, _)| *sid != id);
        registry.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `event` to every listener. The registry lock is released first
    /// so listeners may subscribe or unsubscribe from inside the callback.
    pub fn emit(&self, event: ActivationEvent) {
        let listeners: Vec<Arc<dyn ActivationListener>> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener.on_activated(event);
        }
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
