//! In-memory tab strip implementing [`TabHost`].
//!
//! Stands in for the host browser's tab bookkeeping: windows with ordered
//! tabs, one active tab per window, a focused window and per-tab discarded
//! flags. Used by the demo binary, the RPC bridge and the tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::host::{ActivationListener, ListenerRegistry, SubscriptionId, TabHost};
use crate::types::errors::{HostError, TabError};
use crate::types::tab::{ActivationEvent, Tab, TabId, TabQuery, WindowId};

/// Trait defining the tab strip interface.
pub trait TabManagerTrait {
    fn open_window(&self) -> WindowId;
    fn focus_window(&self, window_id: WindowId) -> Result<(), TabError>;
    fn focused_window(&self) -> Option<WindowId>;
    fn create_tab(&self, window_id: WindowId, url: Option<&str>, active: bool) -> Result<TabId, TabError>;
    fn close_tab(&self, tab_id: TabId) -> Result<(), TabError>;
    fn switch_tab(&self, tab_id: TabId) -> Result<(), TabError>;
    fn discard_tab(&self, tab_id: TabId) -> Result<(), TabError>;
    fn move_tab(&self, tab_id: TabId, new_index: usize) -> Result<(), TabError>;
    fn find_tab(&self, tab_id: TabId) -> Option<Tab>;
    fn tabs_in_window(&self, window_id: WindowId) -> Vec<Tab>;
    fn active_tab(&self, window_id: WindowId) -> Option<Tab>;
    fn tab_count(&self) -> usize;
    fn reload_history(&self) -> Vec<TabId>;
    fn listener_count(&self) -> usize;
}

struct Window {
    id: WindowId,
    order: Vec<TabId>,
    active: Option<TabId>,
}

struct TabRecord {
    window_id: WindowId,
    discarded: bool,
    url: String,
    title: String,
}

struct StripState {
    windows: Vec<Window>,
    tabs: HashMap<TabId, TabRecord>,
    focused: Option<WindowId>,
    next_window_id: WindowId,
    next_tab_id: TabId,
    reloads: Vec<TabId>,
}

impl StripState {
    fn window(&self, window_id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    fn window_mut(&mut self, window_id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id == window_id)
    }

    fn window_of(&self, tab_id: TabId) -> Result<WindowId, TabError> {
        self.tabs
            .get(&tab_id)
            .map(|t| t.window_id)
            .ok_or(TabError::NotFound(tab_id))
    }

    fn snapshot(&self, tab_id: TabId) -> Option<Tab> {
        let record = self.tabs.get(&tab_id)?;
        let window = self.window(record.window_id)?;
        let index = window.order.iter().position(|id| *id == tab_id)?;
        Some(Tab {
            id: tab_id,
            window_id: record.window_id,
            index,
            active: window.active == Some(tab_id),
            discarded: record.discarded,
            url: record.url.clone(),
            title: record.title.clone(),
        })
    }

    fn all_tabs(&self) -> Vec<Tab> {
        self.windows
            .iter()
            .flat_map(|w| w.order.iter())
            .filter_map(|id| self.snapshot(*id))
            .collect()
    }

    /// Marks `tab_id` active in its window. Activating a discarded tab loads it.
    fn activate(&mut self, tab_id: TabId) -> Result<ActivationEvent, TabError> {
        let window_id = self.window_of(tab_id)?;
        if let Some(record) = self.tabs.get_mut(&tab_id) {
            record.discarded = false;
        }
        let window = self
            .window_mut(window_id)
            .ok_or(TabError::WindowNotFound(window_id))?;
        window.active = Some(tab_id);
        Ok(ActivationEvent::new(tab_id, window_id))
    }
}

/// Thread-safe in-memory tab host.
pub struct TabManager {
    state: Mutex<StripState>,
    listeners: ListenerRegistry,
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StripState {
                windows: Vec::new(),
                tabs: HashMap::new(),
                focused: None,
                next_window_id: 1,
                next_tab_id: 1,
                reloads: Vec::new(),
            }),
            listeners: ListenerRegistry::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, StripState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManagerTrait for TabManager {
    /// Open an empty window. The first window opened becomes focused.
    fn open_window(&self) -> WindowId {
        let mut state = self.state();
        let id = state.next_window_id;
        state.next_window_id += 1;
        state.windows.push(Window {
            id,
            order: Vec::new(),
            active: None,
        });
        if state.focused.is_none() {
            state.focused = Some(id);
        }
        id
    }

    fn focus_window(&self, window_id: WindowId) -> Result<(), TabError> {
        let mut state = self.state();
        if state.window(window_id).is_none() {
            return Err(TabError::WindowNotFound(window_id));
        }
        state.focused = Some(window_id);
        Ok(())
    }

    fn focused_window(&self) -> Option<WindowId> {
        self.state().focused
    }

    /// Append a tab to the end of `window_id`.
    /// The tab becomes active when requested or when the window has no active tab,
    /// which emits an activation event.
    fn create_tab(&self, window_id: WindowId, url: Option<&str>, active: bool) -> Result<TabId, TabError> {
        let (id, event) = {
            let mut state = self.state();
            let id = state.next_tab_id;
            let window = state
                .window_mut(window_id)
                .ok_or(TabError::WindowNotFound(window_id))?;
            window.order.push(id);
            let needs_active = active || window.active.is_none();
            state.next_tab_id += 1;

            let url = url.unwrap_or("about:blank").to_string();
            state.tabs.insert(
                id,
                TabRecord {
                    window_id,
                    discarded: false,
                    title: url.clone(),
                    url,
                },
            );
            let event = if needs_active {
                Some(state.activate(id)?)
            } else {
                None
            };
            (id, event)
        };

        if let Some(event) = event {
            self.listeners.emit(event);
        }
        Ok(id)
    }

    /// Close a tab. If it was active, its right neighbor (or the new last tab)
    /// becomes active and an activation event is emitted.
    fn close_tab(&self, tab_id: TabId) -> Result<(), TabError> {
        let event = {
            let mut state = self.state();
            let window_id = state.window_of(tab_id)?;
            state.tabs.remove(&tab_id);

            let window = state
                .window_mut(window_id)
                .ok_or(TabError::WindowNotFound(window_id))?;
            let order_idx = window
                .order
                .iter()
                .position(|id| *id == tab_id)
                .ok_or(TabError::NotFound(tab_id))?;
            window.order.remove(order_idx);

            if window.active != Some(tab_id) {
                None
            } else if window.order.is_empty() {
                window.active = None;
                None
            } else {
                let next_idx = order_idx.min(window.order.len() - 1);
                let next = window.order[next_idx];
                Some(state.activate(next)?)
            }
        };

        if let Some(event) = event {
            self.listeners.emit(event);
        }
        Ok(())
    }

    /// Make `tab_id` the active tab of its window and notify listeners.
    fn switch_tab(&self, tab_id: TabId) -> Result<(), TabError> {
        let event = self.state().activate(tab_id)?;
        self.listeners.emit(event);
        Ok(())
    }

    fn discard_tab(&self, tab_id: TabId) -> Result<(), TabError> {
        let mut state = self.state();
        let window_id = state.window_of(tab_id)?;
        if state.window(window_id).and_then(|w| w.active) == Some(tab_id) {
            return Err(TabError::ActiveTab(tab_id));
        }
        if let Some(record) = state.tabs.get_mut(&tab_id) {
            record.discarded = true;
        }
        Ok(())
    }

    /// Move a tab to a new position within its window.
    fn move_tab(&self, tab_id: TabId, new_index: usize) -> Result<(), TabError> {
        let mut state = self.state();
        let window_id = state.window_of(tab_id)?;
        let window = state
            .window_mut(window_id)
            .ok_or(TabError::WindowNotFound(window_id))?;
        if new_index >= window.order.len() {
            return Err(TabError::InvalidIndex(new_index));
        }
        let order_idx = window
            .order
            .iter()
            .position(|id| *id == tab_id)
            .ok_or(TabError::NotFound(tab_id))?;
        let id = window.order.remove(order_idx);
        window.order.insert(new_index, id);
        Ok(())
    }

    fn find_tab(&self, tab_id: TabId) -> Option<Tab> {
        self.state().snapshot(tab_id)
    }

    fn tabs_in_window(&self, window_id: WindowId) -> Vec<Tab> {
        let state = self.state();
        match state.window(window_id) {
            Some(window) => window
                .order
                .iter()
                .filter_map(|id| state.snapshot(*id))
                .collect(),
            None => Vec::new(),
        }
    }

    fn active_tab(&self, window_id: WindowId) -> Option<Tab> {
        let state = self.state();
        let active = state.window(window_id)?.active?;
        state.snapshot(active)
    }

    fn tab_count(&self) -> usize {
        self.state().tabs.len()
    }

    /// Every tab id passed to a successful reload, in call order.
    fn reload_history(&self) -> Vec<TabId> {
        self.state().reloads.clone()
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[async_trait]
impl TabHost for TabManager {
    async fn get_tab(&self, tab_id: TabId) -> Result<Tab, HostError> {
        Ok(self
            .state()
            .snapshot(tab_id)
            .ok_or(TabError::NotFound(tab_id))?)
    }

    async fn query_tabs(&self, query: &TabQuery) -> Result<Vec<Tab>, HostError> {
        let state = self.state();
        let focused = state.focused;
        Ok(state
            .all_tabs()
            .into_iter()
            .filter(|tab| query.matches(tab, focused))
            .collect())
    }

    async fn reload_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        let mut state = self.state();
        let record = state
            .tabs
            .get_mut(&tab_id)
            .ok_or(TabError::NotFound(tab_id))?;
        record.discarded = false;
        state.reloads.push(tab_id);
        Ok(())
    }

    fn subscribe(&self, listener: Arc<dyn ActivationListener>) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }
}
