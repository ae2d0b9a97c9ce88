//! Validated policy structures

use crate::schema::{
    RawAccessConfig, RawConfig, RawDaemonConfig, RawTarget, RawWarningThreshold, RawWorkout,
    RawWorkoutKind,
};
use crate::validation::{parse_severity, parse_time_policy};
use repgate_api::{Target, TimePolicy, WarningSeverity, WarningThreshold, Workout, WorkoutKind};
use repgate_util::PresetId;
use std::time::Duration;

pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 60;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Validated policy ready for use by the daemon
#[derive(Debug, Clone, Default)]
pub struct Policy {
    pub access: AccessPolicy,
    pub daemon: DaemonConfig,
    pub workouts: Vec<WorkoutPreset>,
    /// Target catalog, in configuration order
    pub targets: Vec<Target>,
}

impl Policy {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            access: AccessPolicy::from_raw(raw.access),
            daemon: DaemonConfig::from_raw(raw.daemon),
            workouts: raw.workouts.into_iter().map(WorkoutPreset::from_raw).collect(),
            targets: raw.targets.into_iter().map(convert_target).collect(),
        }
    }

    /// Get workout preset by ID
    pub fn get_workout(&self, id: &PresetId) -> Option<&WorkoutPreset> {
        self.workouts.iter().find(|w| &w.id == id)
    }
}

/// Access-control settings handed to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    pub grace_period_seconds: u64,
    pub time_policy: TimePolicy,
    pub warnings: Vec<WarningThreshold>,
}

impl AccessPolicy {
    fn from_raw(raw: RawAccessConfig) -> Self {
        Self {
            grace_period_seconds: raw.grace_period_seconds.unwrap_or(DEFAULT_GRACE_PERIOD_SECS),
            time_policy: raw
                .time_policy
                .as_deref()
                .and_then(parse_time_policy)
                .unwrap_or_default(),
            warnings: raw
                .warnings
                .map(|w| w.into_iter().map(convert_warning).collect())
                .unwrap_or_else(default_warning_thresholds),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            grace_period_seconds: DEFAULT_GRACE_PERIOD_SECS,
            time_policy: TimePolicy::default(),
            warnings: default_warning_thresholds(),
        }
    }
}

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub tick_interval: Duration,
}

impl DaemonConfig {
    fn from_raw(raw: RawDaemonConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(
                raw.tick_interval_ms.unwrap_or(DEFAULT_TICK_INTERVAL_MS),
            ),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
        }
    }
}

/// A named workout that can be started from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutPreset {
    pub id: PresetId,
    pub label: String,
    pub workout: Workout,
}

impl WorkoutPreset {
    fn from_raw(raw: RawWorkout) -> Self {
        let kind = convert_kind(raw.kind, raw.custom_name);
        let workout = Workout::new(kind, raw.reps, raw.earned_time_seconds);
        let label = raw
            .label
            .unwrap_or_else(|| format!("{} {}", workout.reps, workout.kind));

        Self {
            id: PresetId::new(raw.id),
            label,
            workout,
        }
    }
}

fn convert_kind(kind: RawWorkoutKind, custom_name: Option<String>) -> WorkoutKind {
    match kind {
        RawWorkoutKind::PushUps => WorkoutKind::PushUps,
        RawWorkoutKind::Squats => WorkoutKind::Squats,
        RawWorkoutKind::SitUps => WorkoutKind::SitUps,
        RawWorkoutKind::JumpingJacks => WorkoutKind::JumpingJacks,
        RawWorkoutKind::Lunges => WorkoutKind::Lunges,
        RawWorkoutKind::Burpees => WorkoutKind::Burpees,
        RawWorkoutKind::Plank => WorkoutKind::Plank,
        RawWorkoutKind::Custom => WorkoutKind::Custom(custom_name.unwrap_or_default()),
    }
}

fn convert_target(raw: RawTarget) -> Target {
    Target {
        id: raw.id.into(),
        label: raw.label,
        category: raw.category,
    }
}

fn convert_warning(raw: RawWarningThreshold) -> WarningThreshold {
    WarningThreshold {
        seconds_before: raw.seconds_before,
        severity: parse_severity(&raw.severity).unwrap_or(WarningSeverity::Warn),
        message_template: raw.message,
    }
}

fn default_warning_thresholds() -> Vec<WarningThreshold> {
    vec![
        WarningThreshold {
            seconds_before: 60,
            severity: WarningSeverity::Warn,
            message_template: Some("1 minute of screen time left".into()),
        },
        WarningThreshold {
            seconds_before: 10,
            severity: WarningSeverity::Critical,
            message_template: Some("10 seconds left!".into()),
        },
    ]
}
