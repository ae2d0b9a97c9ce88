//! Blocking adapter trait interfaces for repgate
//!
//! This crate defines the interface between the daemon and platform-specific
//! enforcement of resolved target lists. It contains no platform code itself.

mod capabilities;
mod mock;
mod traits;

pub use capabilities::*;
pub use mock::*;
pub use traits::*;
