//! Event types emitted by the repgate driver

use repgate_util::{SessionId, TargetId, Timestamp};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{AccessSnapshot, AccessState, API_VERSION, WarningSeverity, Workout};

/// Event envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub api_version: u32,
    /// Instant the driver observed when the event was produced
    pub observed_at: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(observed_at: Timestamp, payload: EventPayload) -> Self {
        Self {
            api_version: API_VERSION,
            observed_at,
            payload,
        }
    }
}

/// All possible events from the driver to renderers and adapters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// Full state snapshot (sent on start and on request)
    StateChanged(AccessSnapshot),

    /// A workout started; access stays blocked until it is completed
    WorkoutStarted { workout: Workout },

    /// The workout in progress was abandoned
    WorkoutCancelled { workout: Workout },

    /// A completed workout opened an unlock window
    Unlocked {
        session_id: SessionId,
        workout: Workout,
        unlock_end: Timestamp,
    },

    /// The unlock window is about to end
    UnlockWarning {
        session_id: SessionId,
        threshold_seconds: u64,
        time_remaining: Duration,
        severity: WarningSeverity,
        message: Option<String>,
    },

    /// The unlock window ended; the grace period is running
    UnlockExpired {
        session_id: SessionId,
        grace_ends: Timestamp,
    },

    /// The grace period elapsed
    Relocked { session_id: SessionId },

    /// Manual override back to locked
    ForcedLock { previous: AccessState },

    /// The resolver produced different target lists
    TargetsChanged {
        blocked: Vec<TargetId>,
        accessible: Vec<TargetId>,
    },

    /// A command was rejected by the access controller
    CommandRejected { command: String, error: String },

    /// Driver is shutting down
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkoutKind;

    #[test]
    fn event_serialization() {
        let event = Event::new(
            Timestamp::from_secs(5),
            EventPayload::Unlocked {
                session_id: SessionId::new(),
                workout: Workout::new(WorkoutKind::PushUps, 20, 600),
                unlock_end: Timestamp::from_secs(605),
            },
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"unlocked\""));

        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api_version, API_VERSION);
        assert_eq!(parsed.observed_at, Timestamp::from_secs(5));
        assert!(matches!(parsed.payload, EventPayload::Unlocked { .. }));
    }

    #[test]
    fn targets_changed_carries_identifiers() {
        let event = Event::new(
            Timestamp::ZERO,
            EventPayload::TargetsChanged {
                blocked: vec![TargetId::new("com.example.video")],
                accessible: vec![],
            },
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("com.example.video"));
    }
}
