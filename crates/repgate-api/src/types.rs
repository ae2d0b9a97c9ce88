//! Shared types for the repgate API

use repgate_util::{SessionId, TargetId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Access state. Exactly one holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    /// Nothing earned, or a previous unlock and its grace period are over
    Locked,
    /// A workout is in progress; targets stay blocked
    Earning,
    /// An earned unlock window is running
    Unlocked,
    /// The unlock window ended and the grace period is running
    Expired,
}

impl AccessState {
    pub const ALL: [AccessState; 4] = [
        AccessState::Locked,
        AccessState::Earning,
        AccessState::Unlocked,
        AccessState::Expired,
    ];

    /// Whether an earned unlock window is active in this state
    pub fn grants_access(self) -> bool {
        matches!(self, AccessState::Unlocked)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessState::Locked => "locked",
            AccessState::Earning => "earning",
            AccessState::Unlocked => "unlocked",
            AccessState::Expired => "expired",
        }
    }
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of exercise
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    PushUps,
    Squats,
    SitUps,
    JumpingJacks,
    Lunges,
    Burpees,
    Plank,
    Custom(String),
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutKind::PushUps => f.write_str("push-ups"),
            WorkoutKind::Squats => f.write_str("squats"),
            WorkoutKind::SitUps => f.write_str("sit-ups"),
            WorkoutKind::JumpingJacks => f.write_str("jumping jacks"),
            WorkoutKind::Lunges => f.write_str("lunges"),
            WorkoutKind::Burpees => f.write_str("burpees"),
            WorkoutKind::Plank => f.write_str("plank"),
            WorkoutKind::Custom(name) => f.write_str(name),
        }
    }
}

/// A workout instance and the unlock time it grants once completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    pub kind: WorkoutKind,
    /// Required repetitions (for timed exercises like plank, seconds held)
    pub reps: u32,
    pub earned_time_seconds: u64,
}

impl Workout {
    pub fn new(kind: WorkoutKind, reps: u32, earned_time_seconds: u64) -> Self {
        Self {
            kind,
            reps,
            earned_time_seconds,
        }
    }

    pub fn earned_time(&self) -> Duration {
        Duration::from_secs(self.earned_time_seconds)
    }
}

/// An entry in the blocking catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Target {
    pub fn new(id: impl Into<TargetId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            category: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Label for display, falling back to the identifier
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Per-target outcome of a resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetDecision {
    Block,
    Allow,
}

/// Resolver output: every catalog target lands in exactly one list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub blocked: Vec<Target>,
    pub accessible: Vec<Target>,
}

impl Resolution {
    pub fn blocked_ids(&self) -> Vec<TargetId> {
        self.blocked.iter().map(|t| t.id.clone()).collect()
    }

    pub fn accessible_ids(&self) -> Vec<TargetId> {
        self.accessible.iter().map(|t| t.id.clone()).collect()
    }

    /// Number of targets across both lists
    pub fn len(&self) -> usize {
        self.blocked.len() + self.accessible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty() && self.accessible.is_empty()
    }
}

/// How the controller treats a `now` earlier than one it already observed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePolicy {
    /// Reject the call
    #[default]
    Strict,
    /// Evaluate the call at the last observed instant
    Clamp,
}

/// Warning severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Info,
    Warn,
    Critical,
}

/// Warning issued shortly before an unlock window ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningThreshold {
    /// Seconds before the unlock ends to issue this warning
    pub seconds_before: u64,
    pub severity: WarningSeverity,
    pub message_template: Option<String>,
}

/// Active unlock session information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub workout: Workout,
    pub unlocked_at: Timestamp,
    pub unlock_end: Timestamp,
    pub warnings_issued: Vec<u64>,
}

/// Consistent view of the controller at one observed instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessSnapshot {
    pub state: AccessState,
    pub observed_at: Timestamp,
    /// Workout in progress (`Earning` only)
    pub pending_workout: Option<Workout>,
    /// Unlock session (`Unlocked` and `Expired`)
    pub session: Option<SessionInfo>,
    /// When the unlock ended (`Expired` only)
    pub expired_at: Option<Timestamp>,
    pub unlock_remaining: Duration,
    pub grace_remaining: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_state_serialization() {
        let json = serde_json::to_string(&AccessState::Unlocked).unwrap();
        assert_eq!(json, "\"unlocked\"");

        let parsed: AccessState = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(parsed, AccessState::Expired);
    }

    #[test]
    fn only_unlocked_grants_access() {
        let granting: Vec<_> = AccessState::ALL
            .into_iter()
            .filter(|s| s.grants_access())
            .collect();
        assert_eq!(granting, vec![AccessState::Unlocked]);
    }

    #[test]
    fn workout_kind_serialization() {
        let json = serde_json::to_string(&WorkoutKind::PushUps).unwrap();
        assert_eq!(json, "\"push_ups\"");

        let custom = WorkoutKind::Custom("yoga".into());
        let json = serde_json::to_string(&custom).unwrap();
        let parsed: WorkoutKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, custom);
        assert_eq!(parsed.to_string(), "yoga");
    }

    #[test]
    fn target_display_name_falls_back_to_id() {
        let bare = Target::new("com.example.video");
        assert_eq!(bare.display_name(), "com.example.video");

        let labelled = Target::new("com.example.video").with_label("Video");
        assert_eq!(labelled.display_name(), "Video");
    }

    #[test]
    fn resolution_counts_both_lists() {
        let resolution = Resolution {
            blocked: vec![Target::new("a"), Target::new("b")],
            accessible: vec![Target::new("c")],
        };
        assert_eq!(resolution.len(), 3);
        assert_eq!(resolution.blocked_ids(), vec![TargetId::new("a"), TargetId::new("b")]);
        assert_eq!(resolution.accessible_ids(), vec![TargetId::new("c")]);
        assert!(Resolution::default().is_empty());
    }

    #[test]
    fn time_policy_defaults_to_strict() {
        assert_eq!(TimePolicy::default(), TimePolicy::Strict);
        let parsed: TimePolicy = serde_json::from_str("\"clamp\"").unwrap();
        assert_eq!(parsed, TimePolicy::Clamp);
    }
}
