//! Page metadata snapshot types.
//!
//! A snapshot keeps the difference between a signal measured as `false` and a
//! signal the runtime could not measure. The wire form collapses both to
//! `false`, which is what the discard engine consumes.

use serde::{Deserialize, Serialize, Serializer};

/// Identity of a frame inside a browsing context.
pub type FrameId = u64;

/// Result of reading one page capability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<T> {
    Measured(T),
    Unsupported,
}

impl<T> Reading<T> {
    pub fn is_supported(&self) -> bool {
        matches!(self, Reading::Measured(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Reading<U> {
        match self {
            Reading::Measured(value) => Reading::Measured(f(value)),
            Reading::Unsupported => Reading::Unsupported,
        }
    }
}

impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Measured(value) => value.serialize(serializer),
            Reading::Unsupported => serializer.serialize_bool(false),
        }
    }
}

/// Whether the sampled frame is the outermost frame of its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameRole {
    Top,
    Embedded,
}

impl FrameRole {
    pub fn of(frame_id: FrameId, top_frame_id: FrameId) -> Self {
        if frame_id == top_frame_id {
            FrameRole::Top
        } else {
            FrameRole::Embedded
        }
    }
}

/// Notification permission as reported by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Default,
}

/// Document loading state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    /// Legacy value some engines still report once loading finished.
    Loaded,
    Complete,
}

impl ReadyState {
    pub fn is_ready(self) -> bool {
        matches!(self, ReadyState::Complete | ReadyState::Loaded)
    }
}

/// Signals sampled in the outermost frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopFrameSnapshot {
    /// Load-start timestamp in milliseconds since the epoch.
    pub time: Reading<f64>,
    /// A picture-in-picture element is present; used as an active-media proxy.
    pub audible: Reading<bool>,
    /// Notification permission is granted.
    pub permission: Reading<bool>,
    pub ready: Reading<bool>,
    /// Total JS heap size in bytes.
    pub memory: Reading<u64>,
    /// The user is interacting with a form field.
    pub forms: Reading<bool>,
}

/// Signals sampled in an embedded frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddedFrameSnapshot {
    pub audible: Reading<bool>,
    pub forms: Reading<bool>,
}

/// Flat record handed to the invoking host on every probe invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageMetadataSnapshot {
    Top(TopFrameSnapshot),
    Embedded(EmbeddedFrameSnapshot),
}

impl PageMetadataSnapshot {
    pub fn role(&self) -> FrameRole {
        match self {
            PageMetadataSnapshot::Top(_) => FrameRole::Top,
            PageMetadataSnapshot::Embedded(_) => FrameRole::Embedded,
        }
    }

    pub fn audible(&self) -> Reading<bool> {
        match self {
            PageMetadataSnapshot::Top(s) => s.audible,
            PageMetadataSnapshot::Embedded(s) => s.audible,
        }
    }

    pub fn forms(&self) -> Reading<bool> {
        match self {
            PageMetadataSnapshot::Top(s) => s.forms,
            PageMetadataSnapshot::Embedded(s) => s.forms,
        }
    }
}
