//! Events emitted by the access controller

use repgate_api::{AccessState, WarningSeverity, Workout};
use repgate_util::{SessionId, Timestamp};
use std::time::Duration;

/// Transitions and notices raised by the access controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessEvent {
    /// Locked -> Earning
    WorkoutStarted { workout: Workout, at: Timestamp },

    /// Earning -> Locked, workout abandoned
    WorkoutCancelled { workout: Workout, at: Timestamp },

    /// Earning -> Unlocked
    UnlockStarted {
        session_id: SessionId,
        workout: Workout,
        unlocked_at: Timestamp,
        unlock_end: Timestamp,
    },

    /// Warning threshold reached while unlocked
    UnlockWarning {
        session_id: SessionId,
        threshold_seconds: u64,
        time_remaining: Duration,
        severity: WarningSeverity,
        message: Option<String>,
    },

    /// Unlocked -> Expired
    UnlockExpired {
        session_id: SessionId,
        expired_at: Timestamp,
        grace_ends: Timestamp,
    },

    /// Expired -> Locked, grace period elapsed
    Relocked { session_id: SessionId, at: Timestamp },

    /// Any state -> Locked by manual override
    ForcedLock { previous: AccessState, at: Timestamp },
}

impl AccessEvent {
    /// State the controller is in right after this event
    pub fn resulting_state(&self) -> AccessState {
        match self {
            AccessEvent::WorkoutStarted { .. } => AccessState::Earning,
            AccessEvent::UnlockStarted { .. } | AccessEvent::UnlockWarning { .. } => {
                AccessState::Unlocked
            }
            AccessEvent::UnlockExpired { .. } => AccessState::Expired,
            AccessEvent::WorkoutCancelled { .. }
            | AccessEvent::Relocked { .. }
            | AccessEvent::ForcedLock { .. } => AccessState::Locked,
        }
    }
}
