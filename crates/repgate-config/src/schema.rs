//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Access-control settings
    #[serde(default)]
    pub access: RawAccessConfig,

    /// Daemon loop settings
    #[serde(default)]
    pub daemon: RawDaemonConfig,

    /// Workout presets that can be started by id
    #[serde(default)]
    pub workouts: Vec<RawWorkout>,

    /// Target catalog
    #[serde(default)]
    pub targets: Vec<RawTarget>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAccessConfig {
    /// Grace period after an unlock ends (default: 60)
    pub grace_period_seconds: Option<u64>,

    /// "strict" or "clamp" (default: strict)
    pub time_policy: Option<String>,

    /// Expiry warnings; the defaults apply when omitted
    pub warnings: Option<Vec<RawWarningThreshold>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDaemonConfig {
    /// Tick interval in milliseconds (default: 1000)
    pub tick_interval_ms: Option<u64>,
}

/// Raw workout preset
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawWorkout {
    /// Unique stable ID, used by `start <id>`
    pub id: String,

    pub kind: RawWorkoutKind,

    /// Required when `kind = "custom"`
    pub custom_name: Option<String>,

    pub reps: u32,

    /// Unlock time granted on completion
    pub earned_time_seconds: u64,

    /// Display label (defaults to a description of the workout)
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RawWorkoutKind {
    PushUps,
    Squats,
    SitUps,
    JumpingJacks,
    Lunges,
    Burpees,
    Plank,
    Custom,
}

/// Raw catalog target
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawTarget {
    pub id: String,
    pub label: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawWarningThreshold {
    pub seconds_before: u64,

    #[serde(default = "default_severity")]
    pub severity: String,

    pub message: Option<String>,
}

fn default_severity() -> String {
    "warn".to_string()
}
