//! Access controller: the single source of truth for the access state

use repgate_api::{AccessSnapshot, AccessState, TimePolicy, WarningThreshold, Workout};
use repgate_util::Timestamp;
use std::time::Duration;
use tracing::{debug, info};

use crate::{AccessError, AccessEvent, AccessResult, Operation, UnlockSession};

/// Settings fixed for the lifetime of a controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Time spent in `Expired` before falling back to `Locked`
    pub grace_period_seconds: u64,

    /// Handling of a `now` earlier than one already observed
    pub time_policy: TimePolicy,

    /// Warnings issued before each unlock window ends
    pub warnings: Vec<WarningThreshold>,
}

impl ControllerConfig {
    pub fn new(grace_period_seconds: u64) -> Self {
        Self {
            grace_period_seconds,
            time_policy: TimePolicy::Strict,
            warnings: Vec::new(),
        }
    }

    pub fn with_time_policy(mut self, time_policy: TimePolicy) -> Self {
        self.time_policy = time_policy;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<WarningThreshold>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_seconds)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new(60)
    }
}

/// Current phase, carrying exactly the timestamps that phase needs
#[derive(Debug, Clone)]
enum Phase {
    Locked,
    Earning {
        workout: Workout,
        started_at: Timestamp,
    },
    Unlocked {
        session: UnlockSession,
    },
    Expired {
        session: UnlockSession,
        expired_at: Timestamp,
    },
}

impl Phase {
    fn state(&self) -> AccessState {
        match self {
            Phase::Locked => AccessState::Locked,
            Phase::Earning { .. } => AccessState::Earning,
            Phase::Unlocked { .. } => AccessState::Unlocked,
            Phase::Expired { .. } => AccessState::Expired,
        }
    }
}

/// The access state machine
///
/// Every operation takes the current instant and first advances the machine
/// to it, so queries and mutations always act on the state that holds at
/// `now`. Calls are transactional: one that returns an error leaves the
/// controller exactly as it was.
#[derive(Debug, Clone)]
pub struct AccessController {
    config: ControllerConfig,
    phase: Phase,
    last_observed: Option<Timestamp>,
    /// Events raised since the last drain
    outbox: Vec<AccessEvent>,
}

impl AccessController {
    pub fn new(config: ControllerConfig) -> Self {
        info!(
            grace_period_secs = config.grace_period_seconds,
            time_policy = ?config.time_policy,
            warning_count = config.warnings.len(),
            "Access controller initialized"
        );

        Self {
            config,
            phase: Phase::Locked,
            last_observed: None,
            outbox: Vec::new(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// State as of the last observed instant, without advancing
    pub fn current_state(&self) -> AccessState {
        self.phase.state()
    }

    pub fn last_observed(&self) -> Option<Timestamp> {
        self.last_observed
    }

    /// Advance to `now` and return every event raised since the last drain
    pub fn tick(&mut self, now: Timestamp) -> AccessResult<Vec<AccessEvent>> {
        self.transact(now, |ctl, _| Ok(ctl.drain_events()))
    }

    /// Begin a workout. Only valid while `Locked`.
    pub fn start_workout(
        &mut self,
        workout: Workout,
        now: Timestamp,
    ) -> AccessResult<Vec<AccessEvent>> {
        self.transact(now, |ctl, now| {
            let state = ctl.phase.state();
            if state != AccessState::Locked {
                return Err(AccessError::InvalidTransition {
                    operation: Operation::StartWorkout,
                    state,
                });
            }
            if workout.earned_time_seconds == 0 {
                return Err(AccessError::ZeroEarnedTime { kind: workout.kind });
            }

            info!(
                kind = %workout.kind,
                reps = workout.reps,
                earned_secs = workout.earned_time_seconds,
                at = %now,
                "Workout started"
            );

            ctl.outbox.push(AccessEvent::WorkoutStarted {
                workout: workout.clone(),
                at: now,
            });
            ctl.phase = Phase::Earning {
                workout,
                started_at: now,
            };
            Ok(ctl.drain_events())
        })
    }

    /// Finish the pending workout and open its unlock window at `now`
    pub fn complete_workout(&mut self, now: Timestamp) -> AccessResult<Vec<AccessEvent>> {
        self.transact(now, |ctl, now| {
            let (workout, started_at) = match std::mem::replace(&mut ctl.phase, Phase::Locked) {
                Phase::Earning {
                    workout,
                    started_at,
                } => (workout, started_at),
                Phase::Locked => return Err(AccessError::NoPendingWorkout),
                other => {
                    return Err(AccessError::InvalidTransition {
                        operation: Operation::CompleteWorkout,
                        state: other.state(),
                    });
                }
            };

            let session = UnlockSession::new(workout, now, &ctl.config.warnings);

            info!(
                session_id = %session.session_id,
                kind = %session.workout.kind,
                workout_secs = now.saturating_duration_since(started_at).as_secs(),
                unlock_end = %session.unlock_end(),
                "Workout completed, unlocked"
            );

            ctl.outbox.push(AccessEvent::UnlockStarted {
                session_id: session.session_id.clone(),
                workout: session.workout.clone(),
                unlocked_at: now,
                unlock_end: session.unlock_end(),
            });
            ctl.phase = Phase::Unlocked { session };
            Ok(ctl.drain_events())
        })
    }

    /// Abandon the pending workout and return to `Locked`
    pub fn cancel_workout(&mut self, now: Timestamp) -> AccessResult<Vec<AccessEvent>> {
        self.transact(now, |ctl, now| {
            let workout = match std::mem::replace(&mut ctl.phase, Phase::Locked) {
                Phase::Earning { workout, .. } => workout,
                other => {
                    return Err(AccessError::InvalidTransition {
                        operation: Operation::CancelWorkout,
                        state: other.state(),
                    });
                }
            };

            info!(kind = %workout.kind, at = %now, "Workout cancelled");

            ctl.outbox.push(AccessEvent::WorkoutCancelled { workout, at: now });
            Ok(ctl.drain_events())
        })
    }

    /// Force `Locked` from any state, dropping every session timestamp
    pub fn lock(&mut self, now: Timestamp) -> AccessResult<Vec<AccessEvent>> {
        self.transact(now, |ctl, now| {
            let previous = ctl.phase.state();
            if previous != AccessState::Locked {
                info!(previous = %previous, at = %now, "Forced lock");
                ctl.phase = Phase::Locked;
                ctl.outbox.push(AccessEvent::ForcedLock { previous, at: now });
            }
            Ok(ctl.drain_events())
        })
    }

    /// State at `now`
    pub fn state(&mut self, now: Timestamp) -> AccessResult<AccessState> {
        self.transact(now, |ctl, _| Ok(ctl.phase.state()))
    }

    /// `max(0, unlock_end - now)` while `Unlocked`, zero otherwise
    pub fn unlock_time_remaining(&mut self, now: Timestamp) -> AccessResult<Duration> {
        self.transact(now, |ctl, now| Ok(ctl.unlock_remaining_at(now)))
    }

    /// `max(0, expired_at + grace - now)` while `Expired`, zero otherwise
    pub fn grace_period_remaining(&mut self, now: Timestamp) -> AccessResult<Duration> {
        self.transact(now, |ctl, now| Ok(ctl.grace_remaining_at(now)))
    }

    /// Consistent view of state and timestamps at `now`
    pub fn snapshot(&mut self, now: Timestamp) -> AccessResult<AccessSnapshot> {
        self.transact(now, |ctl, now| Ok(ctl.build_snapshot(now)))
    }

    /// Run `op` against a copy advanced to `now`; keep the copy only on success
    fn transact<T>(
        &mut self,
        now: Timestamp,
        op: impl FnOnce(&mut Self, Timestamp) -> AccessResult<T>,
    ) -> AccessResult<T> {
        let mut next = self.clone();
        let now = next.observe(now)?;
        next.advance(now);
        let out = op(&mut next, now)?;
        *self = next;
        Ok(out)
    }

    fn observe(&mut self, now: Timestamp) -> AccessResult<Timestamp> {
        match self.last_observed {
            Some(last) if now < last => match self.config.time_policy {
                TimePolicy::Strict => Err(AccessError::OutOfOrderTime { now, last }),
                TimePolicy::Clamp => {
                    debug!(now = %now, last = %last, "Clamping out-of-order time");
                    Ok(last)
                }
            },
            _ => {
                self.last_observed = Some(now);
                Ok(now)
            }
        }
    }

    /// Cross every boundary at or before `now`, in order
    fn advance(&mut self, now: Timestamp) {
        if let Phase::Unlocked { session } = &mut self.phase {
            for warning in session.pending_warnings(now) {
                session.mark_warning_issued(warning.seconds_before);
                let time_remaining = session.time_remaining(now);

                info!(
                    session_id = %session.session_id,
                    threshold_seconds = warning.seconds_before,
                    remaining_secs = time_remaining.as_secs(),
                    "Unlock warning issued"
                );

                self.outbox.push(AccessEvent::UnlockWarning {
                    session_id: session.session_id.clone(),
                    threshold_seconds: warning.seconds_before,
                    time_remaining,
                    severity: warning.severity,
                    message: warning.message_template,
                });
            }
        }

        self.phase = match std::mem::replace(&mut self.phase, Phase::Locked) {
            Phase::Unlocked { session } if session.is_over(now) => {
                let expired_at = session.unlock_end();
                let grace_ends = self.grace_end(expired_at);

                info!(
                    session_id = %session.session_id,
                    expired_at = %expired_at,
                    grace_ends = %grace_ends,
                    "Unlock expired, grace period running"
                );

                self.outbox.push(AccessEvent::UnlockExpired {
                    session_id: session.session_id.clone(),
                    expired_at,
                    grace_ends,
                });
                Phase::Expired {
                    session,
                    expired_at,
                }
            }
            other => other,
        };

        self.phase = match std::mem::replace(&mut self.phase, Phase::Locked) {
            Phase::Expired {
                session,
                expired_at,
            } if now >= self.grace_end(expired_at) => {
                info!(session_id = %session.session_id, "Grace period elapsed, relocked");

                self.outbox.push(AccessEvent::Relocked {
                    session_id: session.session_id,
                    at: self.grace_end(expired_at),
                });
                Phase::Locked
            }
            other => other,
        };
    }

    fn grace_end(&self, expired_at: Timestamp) -> Timestamp {
        expired_at.saturating_add_secs(self.config.grace_period_seconds)
    }

    fn unlock_remaining_at(&self, now: Timestamp) -> Duration {
        match &self.phase {
            Phase::Unlocked { session } => session.time_remaining(now),
            _ => Duration::ZERO,
        }
    }

    fn grace_remaining_at(&self, now: Timestamp) -> Duration {
        match &self.phase {
            Phase::Expired { expired_at, .. } => {
                self.grace_end(*expired_at).saturating_duration_until(now)
            }
            _ => Duration::ZERO,
        }
    }

    fn build_snapshot(&self, now: Timestamp) -> AccessSnapshot {
        let (pending_workout, session, expired_at) = match &self.phase {
            Phase::Locked => (None, None, None),
            Phase::Earning { workout, .. } => (Some(workout.clone()), None, None),
            Phase::Unlocked { session } => (None, Some(session.to_session_info()), None),
            Phase::Expired {
                session,
                expired_at,
            } => (None, Some(session.to_session_info()), Some(*expired_at)),
        };

        AccessSnapshot {
            state: self.phase.state(),
            observed_at: now,
            pending_workout,
            session,
            expired_at,
            unlock_remaining: self.unlock_remaining_at(now),
            grace_remaining: self.grace_remaining_at(now),
        }
    }

    fn drain_events(&mut self) -> Vec<AccessEvent> {
        std::mem::take(&mut self.outbox)
    }
}
