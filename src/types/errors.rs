use std::fmt;

use super::tab::{TabId, WindowId};

// === TabError ===

/// Errors related to in-memory tab strip operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TabError {
    /// Tab with the given ID was not found.
    NotFound(TabId),
    /// Window with the given ID was not found.
    WindowNotFound(WindowId),
    /// The provided tab index is out of bounds.
    InvalidIndex(usize),
    /// The active tab of a window cannot be discarded.
    ActiveTab(TabId),
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabError::NotFound(id) => write!(f, "Tab not found: {}", id),
            TabError::WindowNotFound(id) => write!(f, "Window not found: {}", id),
            TabError::InvalidIndex(index) => write!(f, "Invalid tab index: {}", index),
            TabError::ActiveTab(id) => write!(f, "Cannot discard active tab: {}", id),
        }
    }
}

impl std::error::Error for TabError {}

// === HostError ===

/// Errors returned by the host browser's tab capability surface.
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
    /// The tab vanished before the host could resolve it.
    TabNotFound(TabId),
    /// The host rejected the call.
    Rejected(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::TabNotFound(id) => write!(f, "Host has no tab: {}", id),
            HostError::Rejected(msg) => write!(f, "Host call rejected: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}

impl From<TabError> for HostError {
    fn from(err: TabError) -> Self {
        match err {
            TabError::NotFound(id) => HostError::TabNotFound(id),
            other => HostError::Rejected(other.to_string()),
        }
    }
}

// === CapabilityError ===

/// Errors raised while reading a page capability.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityError {
    /// The runtime does not expose the capability at all.
    Unavailable(&'static str),
    /// The capability exists but the read failed.
    ReadFailed(String),
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityError::Unavailable(name) => write!(f, "Capability unavailable: {}", name),
            CapabilityError::ReadFailed(msg) => write!(f, "Capability read failed: {}", msg),
        }
    }
}

impl std::error::Error for CapabilityError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === LogError ===

/// Errors related to logging initialization.
#[derive(Debug)]
pub enum LogError {
    /// A global subscriber was already installed by this process.
    AlreadyInitialized,
    /// The configured level filter could not be parsed.
    InvalidLevel(String),
    /// Installing the global subscriber failed.
    SetSubscriber(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::AlreadyInitialized => write!(f, "Logging already initialized"),
            LogError::InvalidLevel(level) => write!(f, "Invalid log level: {}", level),
            LogError::SetSubscriber(msg) => {
                write!(f, "Failed to set global subscriber: {}", msg)
            }
        }
    }
}

impl std::error::Error for LogError {}
