//! Metadata Probe.
//!
//! Samples advisory page-state signals from a page or frame context and hands
//! them back to the discard engine as a flat record. Nothing is cached and the
//! page is never mutated; every invocation reads fresh values.
//!
//! Capability reads go through [`detect`], which turns a missing or failing
//! capability into [`Reading::Unsupported`] instead of an error.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::types::errors::CapabilityError;
use crate::types::metadata::{
    EmbeddedFrameSnapshot, FrameId, FrameRole, PageMetadataSnapshot, PermissionState, ReadyState,
    Reading, TopFrameSnapshot,
};

/// Read-only view of the page runtime the probe is evaluated in.
pub trait PageContext {
    fn frame_id(&self) -> FrameId;
    fn top_frame_id(&self) -> FrameId;
    /// Load-start timestamp in milliseconds since the epoch.
    fn load_start(&self) -> Result<f64, CapabilityError>;
    fn picture_in_picture_active(&self) -> Result<bool, CapabilityError>;
    fn notification_permission(&self) -> Result<PermissionState, CapabilityError>;
    fn ready_state(&self) -> Result<ReadyState, CapabilityError>;
    /// Total JS heap size in bytes.
    fn heap_size(&self) -> Result<u64, CapabilityError>;
    fn receiving_form_input(&self) -> Result<bool, CapabilityError>;
}

/// Capability detection: a failed read becomes `Unsupported`.
pub fn detect<T>(capability: &'static str, read: Result<T, CapabilityError>) -> Reading<T> {
    match read {
        Ok(value) => Reading::Measured(value),
        Err(err) => {
            trace!(capability, error = %err, "capability not measurable");
            Reading::Unsupported
        }
    }
}

/// Trait defining the probe interface.
pub trait MetadataProbeTrait {
    fn sample(&self, ctx: &dyn PageContext) -> PageMetadataSnapshot;
    /// Snapshot in the wire form consumed by the discard engine.
    fn collect(&self, ctx: &dyn PageContext) -> serde_json::Value;
}

/// Stateless page metadata probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataProbe;

impl MetadataProbe {
    pub fn new() -> Self {
        Self
    }

    fn sample_top(ctx: &dyn PageContext) -> TopFrameSnapshot {
        let time = match detect("performance.timing", ctx.load_start()) {
            Reading::Measured(t) if t.is_finite() => Reading::Measured(t),
            _ => Reading::Unsupported,
        };
        TopFrameSnapshot {
            time,
            audible: detect("pictureInPictureElement", ctx.picture_in_picture_active()),
            permission: detect("Notification", ctx.notification_permission())
                .map(|p| p == PermissionState::Granted),
            ready: detect("readyState", ctx.ready_state()).map(ReadyState::is_ready),
            memory: detect("performance.memory", ctx.heap_size()),
            forms: detect("formInput", ctx.receiving_form_input()),
        }
    }

    fn sample_embedded(ctx: &dyn PageContext) -> EmbeddedFrameSnapshot {
        EmbeddedFrameSnapshot {
            audible: detect("pictureInPictureElement", ctx.picture_in_picture_active()),
            forms: detect("formInput", ctx.receiving_form_input()),
        }
    }
}

impl MetadataProbeTrait for MetadataProbe {
    /// Build the snapshot for the frame's role. Top-frame-only capabilities are
    /// never read from an embedded frame.
    fn sample(&self, ctx: &dyn PageContext) -> PageMetadataSnapshot {
        match FrameRole::of(ctx.frame_id(), ctx.top_frame_id()) {
            FrameRole::Top => PageMetadataSnapshot::Top(Self::sample_top(ctx)),
            FrameRole::Embedded => PageMetadataSnapshot::Embedded(Self::sample_embedded(ctx)),
        }
    }

    fn collect(&self, ctx: &dyn PageContext) -> serde_json::Value {
        let snapshot = self.sample(ctx);
        serde_json::to_value(&snapshot).unwrap_or(serde_json::Value::Null)
    }
}

/// Page context described by plain values, `None` meaning the runtime does
/// not expose that capability. Deserializable so hosts can ship page state
/// over the RPC bridge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageState {
    pub frame_id: FrameId,
    pub top_frame_id: FrameId,
    pub load_start: Option<f64>,
    pub picture_in_picture: Option<bool>,
    pub notification_permission: Option<PermissionState>,
    pub ready_state: Option<ReadyState>,
    pub heap_size: Option<u64>,
    pub form_input: Option<bool>,
}

impl PageState {
    /// An embedded frame inside `top_frame_id`.
    pub fn embedded(frame_id: FrameId, top_frame_id: FrameId) -> Self {
        Self {
            frame_id,
            top_frame_id,
            ..Self::default()
        }
    }
}

fn available<T: Copy>(value: Option<T>, name: &'static str) -> Result<T, CapabilityError> {
    value.ok_or(CapabilityError::Unavailable(name))
}

impl PageContext for PageState {
    fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    fn top_frame_id(&self) -> FrameId {
        self.top_frame_id
    }

    fn load_start(&self) -> Result<f64, CapabilityError> {
        available(self.load_start, "performance.timing")
    }

    fn picture_in_picture_active(&self) -> Result<bool, CapabilityError> {
        available(self.picture_in_picture, "pictureInPictureElement")
    }

    fn notification_permission(&self) -> Result<PermissionState, CapabilityError> {
        available(self.notification_permission, "Notification")
    }

    fn ready_state(&self) -> Result<ReadyState, CapabilityError> {
        available(self.ready_state, "readyState")
    }

    fn heap_size(&self) -> Result<u64, CapabilityError> {
        available(self.heap_size, "performance.memory")
    }

    fn receiving_form_input(&self) -> Result<bool, CapabilityError> {
        available(self.form_input, "formInput")
    }
}
