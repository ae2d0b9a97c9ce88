//! Thread-safe handle to a single access controller

use repgate_api::{AccessSnapshot, AccessState, Resolution, Target, Workout};
use repgate_util::Timestamp;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::{AccessController, AccessEvent, AccessResult, TargetResolver};

/// Shared access controller
///
/// Every call, queries included, runs under one mutex, so callers on
/// different threads never interleave inside the controller and always see
/// state and timestamps from the same instant.
#[derive(Debug, Clone)]
pub struct SharedController {
    inner: Arc<Mutex<AccessController>>,
}

impl SharedController {
    pub fn new(controller: AccessController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Run `f` with exclusive access to the controller
    pub fn with<T>(&self, f: impl FnOnce(&mut AccessController) -> T) -> T {
        let mut guard = self.lock_inner();
        f(&mut *guard)
    }

    pub fn tick(&self, now: Timestamp) -> AccessResult<Vec<AccessEvent>> {
        self.with(|ctl| ctl.tick(now))
    }

    pub fn start_workout(&self, workout: Workout, now: Timestamp) -> AccessResult<Vec<AccessEvent>> {
        self.with(|ctl| ctl.start_workout(workout, now))
    }

    pub fn complete_workout(&self, now: Timestamp) -> AccessResult<Vec<AccessEvent>> {
        self.with(|ctl| ctl.complete_workout(now))
    }

    pub fn cancel_workout(&self, now: Timestamp) -> AccessResult<Vec<AccessEvent>> {
        self.with(|ctl| ctl.cancel_workout(now))
    }

    pub fn lock(&self, now: Timestamp) -> AccessResult<Vec<AccessEvent>> {
        self.with(|ctl| ctl.lock(now))
    }

    pub fn state(&self, now: Timestamp) -> AccessResult<AccessState> {
        self.with(|ctl| ctl.state(now))
    }

    pub fn unlock_time_remaining(&self, now: Timestamp) -> AccessResult<Duration> {
        self.with(|ctl| ctl.unlock_time_remaining(now))
    }

    pub fn grace_period_remaining(&self, now: Timestamp) -> AccessResult<Duration> {
        self.with(|ctl| ctl.grace_period_remaining(now))
    }

    pub fn snapshot(&self, now: Timestamp) -> AccessResult<AccessSnapshot> {
        self.with(|ctl| ctl.snapshot(now))
    }

    /// Snapshot and resolve the catalog against it under a single lock
    pub fn resolve<R: TargetResolver + ?Sized>(
        &self,
        now: Timestamp,
        targets: &[Target],
        resolver: &R,
    ) -> AccessResult<(AccessSnapshot, Resolution)> {
        self.with(|ctl| {
            let snapshot = ctl.snapshot(now)?;
            let resolution = resolver.resolve(snapshot.state, targets)?;
            Ok((snapshot, resolution))
        })
    }

    // Controller calls are transactional, so a panic inside one cannot have
    // left a half-applied value behind the poisoned lock.
    fn lock_inner(&self) -> MutexGuard<'_, AccessController> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AllOrNothingResolver, ControllerConfig};
    use repgate_api::{TimePolicy, WorkoutKind};
    use std::thread;

    fn shared(policy: TimePolicy) -> SharedController {
        SharedController::new(AccessController::new(
            ControllerConfig::new(30).with_time_policy(policy),
        ))
    }

    #[test]
    fn test_clones_share_one_controller() {
        let a = shared(TimePolicy::Strict);
        let b = a.clone();

        a.start_workout(
            Workout::new(WorkoutKind::Burpees, 10, 300),
            Timestamp::from_secs(0),
        )
        .unwrap();
        assert_eq!(b.state(Timestamp::from_secs(1)).unwrap(), AccessState::Earning);
    }

    #[test]
    fn test_resolve_uses_one_snapshot() {
        let ctl = shared(TimePolicy::Strict);
        let targets = vec![Target::new("A"), Target::new("B")];

        ctl.start_workout(
            Workout::new(WorkoutKind::PushUps, 20, 600),
            Timestamp::from_secs(0),
        )
        .unwrap();
        ctl.complete_workout(Timestamp::from_secs(5)).unwrap();

        let (snapshot, resolution) = ctl
            .resolve(Timestamp::from_secs(100), &targets, &AllOrNothingResolver)
            .unwrap();
        assert_eq!(snapshot.state, AccessState::Unlocked);
        assert_eq!(resolution.accessible.len(), 2);

        let (snapshot, resolution) = ctl
            .resolve(Timestamp::from_secs(605), &targets, &AllOrNothingResolver)
            .unwrap();
        assert_eq!(snapshot.state, AccessState::Expired);
        assert_eq!(resolution.blocked.len(), 2);
    }

    #[test]
    fn test_resolve_surfaces_catalog_errors() {
        let ctl = shared(TimePolicy::Strict);
        let targets = vec![Target::new("A"), Target::new("A")];

        let err = ctl
            .resolve(Timestamp::ZERO, &targets, &AllOrNothingResolver)
            .unwrap_err();
        assert!(matches!(err, crate::AccessError::Catalog(_)));
    }

    #[test]
    fn test_concurrent_callers_serialize() {
        let ctl = shared(TimePolicy::Clamp);
        ctl.start_workout(
            Workout::new(WorkoutKind::Squats, 30, 1_000),
            Timestamp::from_secs(0),
        )
        .unwrap();
        ctl.complete_workout(Timestamp::from_secs(0)).unwrap();

        let handles: Vec<_> = (0..8u64)
            .map(|worker| {
                let ctl = ctl.clone();
                thread::spawn(move || {
                    for step in 0..200u64 {
                        let now = Timestamp::from_secs(worker * 200 + step);
                        let snapshot = ctl.snapshot(now).unwrap();
                        // State and remaining times always come from the same instant
                        match snapshot.state {
                            AccessState::Unlocked => {
                                assert_eq!(snapshot.grace_remaining, Duration::ZERO)
                            }
                            AccessState::Expired => {
                                assert_eq!(snapshot.unlock_remaining, Duration::ZERO)
                            }
                            AccessState::Locked => {
                                assert!(snapshot.session.is_none())
                            }
                            AccessState::Earning => panic!("never re-enters earning"),
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            ctl.state(Timestamp::from_secs(1_599)).unwrap(),
            AccessState::Locked
        );
    }
}
