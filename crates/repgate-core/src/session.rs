//! Unlock session tracking

use repgate_api::{SessionInfo, WarningThreshold, Workout};
use repgate_util::{SessionId, Timestamp};
use std::collections::HashSet;
use std::time::Duration;

/// Unlock window opened by a completed workout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockSession {
    pub session_id: SessionId,

    /// Workout that earned this unlock
    pub workout: Workout,

    /// Instant the workout was completed
    pub unlocked_at: Timestamp,

    /// Warnings to issue before the window ends
    pub warnings: Vec<WarningThreshold>,

    /// Warning thresholds already issued (seconds before the end)
    pub warnings_issued: Vec<u64>,
}

impl UnlockSession {
    /// Repeated thresholds keep only their first occurrence
    pub fn new(workout: Workout, unlocked_at: Timestamp, warnings: &[WarningThreshold]) -> Self {
        let mut seen = HashSet::new();
        let warnings = warnings
            .iter()
            .filter(|w| seen.insert(w.seconds_before))
            .cloned()
            .collect();

        Self {
            session_id: SessionId::new(),
            workout,
            unlocked_at,
            warnings,
            warnings_issued: Vec::new(),
        }
    }

    /// `unlocked_at + earned_time_seconds`
    pub fn unlock_end(&self) -> Timestamp {
        self.unlocked_at
            .saturating_add_secs(self.workout.earned_time_seconds)
    }

    pub fn time_remaining(&self, now: Timestamp) -> Duration {
        self.unlock_end().saturating_duration_until(now)
    }

    /// The end instant itself already counts as over
    pub fn is_over(&self, now: Timestamp) -> bool {
        now >= self.unlock_end()
    }

    /// Warning thresholds with the instant each one triggers at.
    /// Thresholds not shorter than the window are skipped.
    pub fn warning_times(&self) -> Vec<(u64, Timestamp)> {
        let earned = self.workout.earned_time_seconds;
        self.warnings
            .iter()
            .filter(|w| w.seconds_before < earned)
            .map(|w| {
                let trigger_at = self.unlocked_at.saturating_add_secs(earned - w.seconds_before);
                (w.seconds_before, trigger_at)
            })
            .collect()
    }

    /// Warnings that should be issued at `now`
    pub fn pending_warnings(&self, now: Timestamp) -> Vec<WarningThreshold> {
        if self.is_over(now) {
            return Vec::new();
        }

        let due: Vec<u64> = self
            .warning_times()
            .into_iter()
            .filter(|(threshold, trigger_at)| {
                now >= *trigger_at && !self.warnings_issued.contains(threshold)
            })
            .map(|(threshold, _)| threshold)
            .collect();

        self.warnings
            .iter()
            .filter(|w| due.contains(&w.seconds_before))
            .cloned()
            .collect()
    }

    pub fn mark_warning_issued(&mut self, threshold: u64) {
        if !self.warnings_issued.contains(&threshold) {
            self.warnings_issued.push(threshold);
        }
    }

    pub fn to_session_info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.session_id.clone(),
            workout: self.workout.clone(),
            unlocked_at: self.unlocked_at,
            unlock_end: self.unlock_end(),
            warnings_issued: self.warnings_issued.clone(),
        }
    }
}
