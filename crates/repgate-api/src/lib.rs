//! Shared types for repgate
//!
//! This crate defines the vocabulary shared between the access core and its
//! collaborators:
//! - Access states, workouts and targets
//! - Resolver output (`Resolution`), always two target lists
//! - Snapshots for renderers
//! - Outbound events emitted by the driver
//! - Versioning

mod events;
mod types;

pub use events::*;
pub use types::*;

/// Current API version
pub const API_VERSION: u32 = 1;
