//! tabkeeper — keeps discarded background tabs discarded and samples page
//! state for an external discard engine.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod host;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
