//! Configuration parsing and validation for repgate
//!
//! Supports TOML configuration with:
//! - Versioned schema
//! - Access settings (grace period, time policy, expiry warnings)
//! - Workout presets and the target catalog
//! - Validation that reports every problem at once

mod policy;
mod schema;
mod validation;

pub use policy::*;
pub use schema::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Policy> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading configuration");
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<Policy> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_config(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    Ok(Policy::from_raw(raw))
}

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use repgate_api::{TimePolicy, WorkoutKind};
    use std::io::Write;

    const FULL_CONFIG: &str = r#"
        config_version = 1

        [access]
        grace_period_seconds = 30
        time_policy = "clamp"

        [[access.warnings]]
        seconds_before = 120
        severity = "info"
        message = "2 minutes left"

        [daemon]
        tick_interval_ms = 500

        [[workouts]]
        id = "pushups"
        kind = "push_ups"
        reps = 20
        earned_time_seconds = 600

        [[workouts]]
        id = "yoga"
        kind = "custom"
        custom_name = "sun salutations"
        reps = 5
        earned_time_seconds = 900
        label = "Yoga flow"

        [[targets]]
        id = "com.example.video"
        label = "Video"
        category = "entertainment"

        [[targets]]
        id = "com.example.games"
    "#;

    #[test]
    fn parse_minimal_config() {
        let policy = parse_config("config_version = 1").unwrap();
        assert_eq!(policy.access.grace_period_seconds, DEFAULT_GRACE_PERIOD_SECS);
        assert_eq!(policy.access.time_policy, TimePolicy::Strict);
        assert!(policy.workouts.is_empty());
        assert!(policy.targets.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let policy = parse_config(FULL_CONFIG).unwrap();

        assert_eq!(policy.access.grace_period_seconds, 30);
        assert_eq!(policy.access.time_policy, TimePolicy::Clamp);
        assert_eq!(policy.access.warnings.len(), 1);
        assert_eq!(policy.daemon.tick_interval.as_millis(), 500);

        assert_eq!(policy.workouts.len(), 2);
        let yoga = policy.get_workout(&"yoga".into()).unwrap();
        assert_eq!(
            yoga.workout.kind,
            WorkoutKind::Custom("sun salutations".into())
        );
        assert_eq!(yoga.label, "Yoga flow");

        assert_eq!(policy.targets.len(), 2);
        assert_eq!(policy.targets[0].display_name(), "Video");
        assert_eq!(policy.targets[1].display_name(), "com.example.games");
    }

    #[test]
    fn reject_wrong_version() {
        let result = parse_config("config_version = 99");
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(99))));
    }

    #[test]
    fn reject_invalid_config_with_all_errors() {
        let config = r#"
            config_version = 1

            [[workouts]]
            id = "lazy"
            kind = "squats"
            reps = 10
            earned_time_seconds = 0

            [[targets]]
            id = "a"

            [[targets]]
            id = "a"
        "#;

        match parse_config(config) {
            Err(ConfigError::ValidationFailed { errors }) => assert_eq!(errors.len(), 2),
            other => panic!("Expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let policy = load_config(file.path()).unwrap();
        assert_eq!(policy.workouts.len(), 2);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
