//! Blocking capabilities model

use serde::{Deserialize, Serialize};

/// Describes what a blocking adapter can enforce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingCapabilities {
    /// Short platform name, for logs
    pub platform: String,

    /// Can block some targets while leaving others accessible.
    /// Without it only all-blocked or all-accessible resolutions apply.
    pub can_block_per_target: bool,

    /// Can close targets that are already open when they become blocked
    pub can_interrupt_running: bool,

    /// Can report which target is in the foreground (optional)
    pub can_observe_foreground: bool,
}

impl BlockingCapabilities {
    /// All-or-nothing blocking only
    pub fn minimal() -> Self {
        Self {
            platform: "generic".into(),
            can_block_per_target: false,
            can_interrupt_running: false,
            can_observe_foreground: false,
        }
    }

    /// Everything a full platform integration could offer
    pub fn full(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            can_block_per_target: true,
            can_interrupt_running: true,
            can_observe_foreground: true,
        }
    }
}

impl Default for BlockingCapabilities {
    fn default() -> Self {
        Self::minimal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_capabilities() {
        let caps = BlockingCapabilities::minimal();
        assert!(!caps.can_block_per_target);
        assert_eq!(caps, BlockingCapabilities::default());
    }

    #[test]
    fn capabilities_serialization() {
        let caps = BlockingCapabilities::full("android");
        let json = serde_json::to_string(&caps).unwrap();
        let back: BlockingCapabilities = serde_json::from_str(&json).unwrap();
        assert_eq!(back, caps);
        assert!(json.contains("\"platform\":\"android\""));
    }
}
