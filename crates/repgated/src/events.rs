//! Translation of controller events into outbound API events

use repgate_api::EventPayload;
use repgate_core::AccessEvent;

pub fn to_payload(event: &AccessEvent) -> EventPayload {
    match event.clone() {
        AccessEvent::WorkoutStarted { workout, .. } => EventPayload::WorkoutStarted { workout },
        AccessEvent::WorkoutCancelled { workout, .. } => EventPayload::WorkoutCancelled { workout },
        AccessEvent::UnlockStarted {
            session_id,
            workout,
            unlock_end,
            ..
        } => EventPayload::Unlocked {
            session_id,
            workout,
            unlock_end,
        },
        AccessEvent::UnlockWarning {
            session_id,
            threshold_seconds,
            time_remaining,
            severity,
            message,
        } => EventPayload::UnlockWarning {
            session_id,
            threshold_seconds,
            time_remaining,
            severity,
            message,
        },
        AccessEvent::UnlockExpired {
            session_id,
            grace_ends,
            ..
        } => EventPayload::UnlockExpired {
            session_id,
            grace_ends,
        },
        AccessEvent::Relocked { session_id, .. } => EventPayload::Relocked { session_id },
        AccessEvent::ForcedLock { previous, .. } => EventPayload::ForcedLock { previous },
    }
}

/// Instant at which a controller event happened, when it carries one
pub fn occurred_at(event: &AccessEvent) -> Option<repgate_util::Timestamp> {
    match event {
        AccessEvent::WorkoutStarted { at, .. }
        | AccessEvent::WorkoutCancelled { at, .. }
        | AccessEvent::Relocked { at, .. }
        | AccessEvent::ForcedLock { at, .. } => Some(*at),
        AccessEvent::UnlockStarted { unlocked_at, .. } => Some(*unlocked_at),
        AccessEvent::UnlockExpired { expired_at, .. } => Some(*expired_at),
        AccessEvent::UnlockWarning { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repgate_api::{AccessState, Workout, WorkoutKind};
    use repgate_util::{SessionId, Timestamp};

    #[test]
    fn unlock_events_keep_session_details() {
        let session_id = SessionId::new();
        let workout = Workout::new(WorkoutKind::PushUps, 20, 600);
        let event = AccessEvent::UnlockStarted {
            session_id: session_id.clone(),
            workout: workout.clone(),
            unlocked_at: Timestamp::from_secs(5),
            unlock_end: Timestamp::from_secs(605),
        };

        match to_payload(&event) {
            EventPayload::Unlocked {
                session_id: id,
                workout: w,
                unlock_end,
            } => {
                assert_eq!(id, session_id);
                assert_eq!(w, workout);
                assert_eq!(unlock_end, Timestamp::from_secs(605));
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert_eq!(occurred_at(&event), Some(Timestamp::from_secs(5)));
    }

    #[test]
    fn forced_lock_reports_previous_state() {
        let event = AccessEvent::ForcedLock {
            previous: AccessState::Expired,
            at: Timestamp::from_secs(9),
        };

        assert!(matches!(
            to_payload(&event),
            EventPayload::ForcedLock {
                previous: AccessState::Expired
            }
        ));
        assert_eq!(occurred_at(&event), Some(Timestamp::from_secs(9)));
    }
}
