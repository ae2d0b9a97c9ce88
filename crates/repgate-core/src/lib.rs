//! Access-control core for repgate
//!
//! This crate is the heart of repgate, containing:
//! - The access state machine (Locked -> Earning -> Unlocked -> Expired -> Locked)
//! - Target resolution (state + catalog -> blocked and accessible lists)
//! - Expiry warning scheduling
//! - The renderer-facing screen derivation
//!
//! Nothing here reads a clock. Every operation is given the current instant.

mod controller;
mod error;
mod events;
mod resolver;
mod session;
mod shared;
mod view;

pub use controller::*;
pub use error::*;
pub use events::*;
pub use resolver::*;
pub use session::*;
pub use shared::*;
pub use view::*;
