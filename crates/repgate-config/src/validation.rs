//! Configuration validation

use crate::schema::{RawConfig, RawWarningThreshold, RawWorkout, RawWorkoutKind};
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Workout '{workout_id}': {message}")]
    WorkoutError { workout_id: String, message: String },

    #[error("Duplicate workout ID: {0}")]
    DuplicateWorkoutId(String),

    #[error("Target #{index} has an empty ID")]
    EmptyTargetId { index: usize },

    #[error("Duplicate target ID: {0}")]
    DuplicateTargetId(String),

    #[error("Unknown time policy '{0}' (expected \"strict\" or \"clamp\")")]
    UnknownTimePolicy(String),

    #[error("Unknown warning severity '{0}' (expected \"info\", \"warn\" or \"critical\")")]
    UnknownSeverity(String),

    #[error("Warning threshold {seconds}s is repeated")]
    DuplicateWarning { seconds: u64 },

    #[error("Global config error: {0}")]
    GlobalError(String),
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(policy) = &config.access.time_policy {
        if parse_time_policy(policy).is_none() {
            errors.push(ValidationError::UnknownTimePolicy(policy.clone()));
        }
    }

    if let Some(warnings) = &config.access.warnings {
        errors.extend(validate_warnings(warnings));
    }

    if config.daemon.tick_interval_ms == Some(0) {
        errors.push(ValidationError::GlobalError(
            "tick_interval_ms must be greater than 0".into(),
        ));
    }

    let mut seen_ids = HashSet::new();
    for workout in &config.workouts {
        if !seen_ids.insert(&workout.id) {
            errors.push(ValidationError::DuplicateWorkoutId(workout.id.clone()));
        }
    }

    for workout in &config.workouts {
        errors.extend(validate_workout(workout));
    }

    let mut seen_ids = HashSet::new();
    for (index, target) in config.targets.iter().enumerate() {
        if target.id.trim().is_empty() {
            errors.push(ValidationError::EmptyTargetId { index });
        } else if !seen_ids.insert(&target.id) {
            errors.push(ValidationError::DuplicateTargetId(target.id.clone()));
        }
    }

    errors
}

fn validate_workout(workout: &RawWorkout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut fail = |message: &str| {
        errors.push(ValidationError::WorkoutError {
            workout_id: workout.id.clone(),
            message: message.to_string(),
        })
    };

    if workout.id.trim().is_empty() {
        fail("id is empty");
    }

    if workout.earned_time_seconds == 0 {
        fail("earned_time_seconds must be greater than 0");
    }

    match (workout.kind, &workout.custom_name) {
        (RawWorkoutKind::Custom, None) => fail("custom workouts need a custom_name"),
        (RawWorkoutKind::Custom, Some(name)) if name.trim().is_empty() => {
            fail("custom_name is empty")
        }
        (RawWorkoutKind::Custom, Some(_)) | (_, None) => {}
        (_, Some(_)) => fail("custom_name is only valid with kind = \"custom\""),
    }

    errors
}

fn validate_warnings(warnings: &[RawWarningThreshold]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for warning in warnings {
        if parse_severity(&warning.severity).is_none() {
            errors.push(ValidationError::UnknownSeverity(warning.severity.clone()));
        }
        if warning.seconds_before == 0 {
            errors.push(ValidationError::GlobalError(
                "warning seconds_before must be greater than 0".into(),
            ));
        }
        if !seen.insert(warning.seconds_before) {
            errors.push(ValidationError::DuplicateWarning {
                seconds: warning.seconds_before,
            });
        }
    }

    errors
}

/// Parse a time policy name
pub fn parse_time_policy(s: &str) -> Option<repgate_api::TimePolicy> {
    match s.to_lowercase().as_str() {
        "strict" => Some(repgate_api::TimePolicy::Strict),
        "clamp" => Some(repgate_api::TimePolicy::Clamp),
        _ => None,
    }
}

/// Parse a warning severity name
pub fn parse_severity(s: &str) -> Option<repgate_api::WarningSeverity> {
    match s.to_lowercase().as_str() {
        "info" => Some(repgate_api::WarningSeverity::Info),
        "warn" | "warning" => Some(repgate_api::WarningSeverity::Warn),
        "critical" => Some(repgate_api::WarningSeverity::Critical),
        _ => None,
    }
}
