//! Shared utilities for repgate
//!
//! This crate provides:
//! - ID types (TargetId, PresetId, SessionId)
//! - `Timestamp`, the whole-second instant every core operation is given
//! - The single wall-clock reader (`now`), with mock time in debug builds
//! - Default paths for the configuration file

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
