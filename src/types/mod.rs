// tabkeeper shared type definitions
// Each submodule defines types used across the crate.

pub mod errors;
pub mod metadata;
pub mod settings;
pub mod tab;
