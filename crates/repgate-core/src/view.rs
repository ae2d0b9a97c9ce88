//! Screen derivation for renderers
//!
//! Renderers combine the access state with the resolved target lists. The
//! blocked list wins: a non-empty blocked list never yields the unlocked
//! screen, whatever the state says.

use repgate_api::{AccessSnapshot, AccessState, Resolution, Workout};
use std::time::Duration;
use tracing::warn;

/// What a renderer should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Access is blocked; prompt for a workout
    Locked { blocked: usize },
    /// Workout in progress
    Earning { workout: Workout },
    /// Earned access; show the countdown
    Unlocked {
        remaining: Duration,
        accessible: usize,
    },
    /// Unlock over, grace period counting down; still blocked
    GracePeriod { remaining: Duration, blocked: usize },
}

impl Screen {
    pub fn shows_unlocked_content(&self) -> bool {
        matches!(self, Screen::Unlocked { .. })
    }
}

pub fn derive_screen(snapshot: &AccessSnapshot, resolution: &Resolution) -> Screen {
    let blocked = resolution.blocked.len();

    match snapshot.state {
        AccessState::Unlocked if blocked == 0 => Screen::Unlocked {
            remaining: snapshot.unlock_remaining,
            accessible: resolution.accessible.len(),
        },
        AccessState::Unlocked => {
            warn!(
                blocked,
                observed_at = %snapshot.observed_at,
                "Targets still blocked while unlocked, refusing unlocked screen"
            );
            Screen::Locked { blocked }
        }
        AccessState::Earning => match &snapshot.pending_workout {
            Some(workout) => Screen::Earning {
                workout: workout.clone(),
            },
            None => Screen::Locked { blocked },
        },
        AccessState::Expired => Screen::GracePeriod {
            remaining: snapshot.grace_remaining,
            blocked,
        },
        AccessState::Locked => Screen::Locked { blocked },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessController, AllOrNothingResolver, ControllerConfig, TargetResolver};
    use repgate_api::{Target, TargetDecision, WorkoutKind};
    use repgate_util::Timestamp;

    /// A broken resolver that never lets anything through
    struct StuckResolver;

    impl TargetResolver for StuckResolver {
        fn decide(&self, _state: AccessState, _target: &Target) -> TargetDecision {
            TargetDecision::Block
        }
    }

    fn catalog() -> Vec<Target> {
        vec![Target::new("A"), Target::new("B"), Target::new("C")]
    }

    fn unlocked_snapshot() -> AccessSnapshot {
        let mut ctl = AccessController::new(ControllerConfig::new(30));
        let now = Timestamp::from_secs(5);
        ctl.start_workout(Workout::new(WorkoutKind::PushUps, 20, 600), now)
            .unwrap();
        ctl.complete_workout(now).unwrap();
        ctl.snapshot(now).unwrap()
    }

    #[test]
    fn test_unlocked_screen_when_nothing_blocked() {
        let snapshot = unlocked_snapshot();
        let resolution = AllOrNothingResolver
            .resolve(snapshot.state, &catalog())
            .unwrap();

        let screen = derive_screen(&snapshot, &resolution);
        assert_eq!(
            screen,
            Screen::Unlocked {
                remaining: Duration::from_secs(600),
                accessible: 3
            }
        );
        assert!(screen.shows_unlocked_content());
    }

    #[test]
    fn test_blocked_list_overrides_unlocked_state() {
        let snapshot = unlocked_snapshot();
        assert_eq!(snapshot.state, AccessState::Unlocked);

        let resolution = StuckResolver.resolve(snapshot.state, &catalog()).unwrap();
        let screen = derive_screen(&snapshot, &resolution);

        assert!(!screen.shows_unlocked_content());
        assert_eq!(screen, Screen::Locked { blocked: 3 });
    }

    #[test]
    fn test_any_blocked_target_refuses_unlocked_screen() {
        let snapshot = unlocked_snapshot();
        let resolution = Resolution {
            blocked: vec![Target::new("B")],
            accessible: vec![Target::new("A"), Target::new("C")],
        };

        assert!(!derive_screen(&snapshot, &resolution).shows_unlocked_content());
    }

    #[test]
    fn test_no_unlocked_screen_outside_unlocked_state() {
        let mut ctl = AccessController::new(ControllerConfig::new(30));
        let catalog = catalog();

        // Even a resolver that allows everything cannot unlock these screens
        let everything_allowed = Resolution {
            blocked: vec![],
            accessible: catalog.clone(),
        };

        let snapshot = ctl.snapshot(Timestamp::ZERO).unwrap();
        let screen = derive_screen(&snapshot, &everything_allowed);
        assert_eq!(screen, Screen::Locked { blocked: 0 });

        ctl.start_workout(
            Workout::new(WorkoutKind::Squats, 30, 300),
            Timestamp::from_secs(1),
        )
        .unwrap();
        let snapshot = ctl.snapshot(Timestamp::from_secs(2)).unwrap();
        assert!(matches!(
            derive_screen(&snapshot, &everything_allowed),
            Screen::Earning { .. }
        ));

        ctl.complete_workout(Timestamp::from_secs(3)).unwrap();
        let snapshot = ctl.snapshot(Timestamp::from_secs(310)).unwrap();
        let resolution = AllOrNothingResolver.resolve(snapshot.state, &catalog).unwrap();
        assert_eq!(
            derive_screen(&snapshot, &resolution),
            Screen::GracePeriod {
                remaining: Duration::from_secs(23),
                blocked: 3
            }
        );
    }
}
