use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier.
pub type TabId = u32;

/// Host-assigned window identifier.
pub type WindowId = u32;

/// Represents a browser tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub window_id: WindowId,
    /// Ordinal position within the owning window, starting at 0.
    pub index: usize,
    pub active: bool,
    /// Unloaded from memory but still present in the tab strip.
    pub discarded: bool,
    pub url: String,
    pub title: String,
}

/// Notification that a tab became the foreground tab of its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationEvent {
    pub tab_id: TabId,
    pub window_id: WindowId,
}

impl ActivationEvent {
    pub fn new(tab_id: TabId, window_id: WindowId) -> Self {
        Self { tab_id, window_id }
    }
}

impl From<&Tab> for ActivationEvent {
    fn from(tab: &Tab) -> Self {
        Self::new(tab.id, tab.window_id)
    }
}

/// Filter passed to the host's tab query. Every field that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<WindowId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discarded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Restrict to the currently focused window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_window: Option<bool>,
}

impl TabQuery {
    /// Discarded tab sitting immediately to the right of `tab` in the same window.
    pub fn discarded_neighbor(window_id: WindowId, tab: &Tab) -> Self {
        Self {
            window_id: Some(window_id),
            index: Some(tab.index + 1),
            discarded: Some(true),
            ..Self::default()
        }
    }

    /// Active tab of the focused window.
    pub fn active_in_current_window() -> Self {
        Self {
            active: Some(true),
            current_window: Some(true),
            ..Self::default()
        }
    }

    /// Whether `tab` satisfies the filter given the host's focused window.
    pub fn matches(&self, tab: &Tab, focused_window: Option<WindowId>) -> bool {
        if let Some(window_id) = self.window_id {
            if tab.window_id != window_id {
                return false;
            }
        }
        if let Some(index) = self.index {
            if tab.index != index {
                return false;
            }
        }
        if let Some(discarded) = self.discarded {
            if tab.discarded != discarded {
                return false;
            }
        }
        if let Some(active) = self.active {
            if tab.active != active {
                return false;
            }
        }
        if let Some(current) = self.current_window {
            let in_focused = focused_window == Some(tab.window_id);
            if in_focused != current {
                return false;
            }
        }
        true
    }
}
