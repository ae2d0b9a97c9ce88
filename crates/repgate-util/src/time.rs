//! Time utilities for repgate
//!
//! The access core never reads a clock. It works on [`Timestamp`], a count of
//! whole seconds on whatever timeline the caller chose, and every operation is
//! handed the current instant. [`now`] is the only place a wall clock is read;
//! the driver converts its result with [`Timestamp::from_datetime`].
//!
//! # Mock Time for Development
//!
//! In debug builds, the `REPGATE_MOCK_TIME` environment variable can be set
//! to override the system time. Mock time advances at the real rate from the
//! given starting point.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 14:30:00`)

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "REPGATE_MOCK_TIME";

/// Format accepted by `REPGATE_MOCK_TIME`
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offset between mock time and real time, computed once per process.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // wraps Local::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            let mock_time_str = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            let Ok(naive_dt) = NaiveDateTime::parse_from_str(&mock_time_str, MOCK_TIME_FORMAT)
            else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    expected_format = MOCK_TIME_FORMAT,
                    "Invalid mock time format"
                );
                return None;
            };
            let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() else {
                tracing::warn!(
                    mock_time = %mock_time_str,
                    "Failed to convert mock time to local timezone"
                );
                return None;
            };
            let offset = mock_dt.signed_duration_since(chrono::Local::now());
            tracing::info!(
                mock_time = %mock_time_str,
                offset_secs = offset.num_seconds(),
                "Mock time enabled"
            );
            Some(offset)
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // the one wall-clock read
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Format a DateTime with full date and time.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// An instant in whole seconds on the caller's timeline
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Seconds since the Unix epoch; instants before the epoch clamp to zero
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(u64::try_from(dt.timestamp()).unwrap_or(0))
    }

    /// `self + secs`, saturating at the end of the timeline
    pub fn saturating_add_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Time from `from` until `self`, or zero if `self` is not after `from`
    pub fn saturating_duration_until(self, from: Timestamp) -> Duration {
        Duration::from_secs(self.0.saturating_sub(from.0))
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is in the future
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_secs(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}s", self.0)
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

/// Helper to format durations in human-readable form
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};

    #[test]
    fn test_timestamp_ordering() {
        let early = Timestamp::from_secs(5);
        let late = Timestamp::from_secs(605);
        assert!(early < late);
        assert_eq!(early.saturating_add_secs(600), late);
    }

    #[test]
    fn test_saturating_durations() {
        let t0 = Timestamp::from_secs(100);
        let t1 = Timestamp::from_secs(130);

        assert_eq!(t1.saturating_duration_until(t0), Duration::from_secs(30));
        assert_eq!(t0.saturating_duration_until(t1), Duration::ZERO);
        assert_eq!(t1.saturating_duration_since(t0), Duration::from_secs(30));
        assert_eq!(t0.saturating_duration_since(t1), Duration::ZERO);
    }

    #[test]
    fn test_saturating_add_at_end_of_timeline() {
        let end = Timestamp::from_secs(u64::MAX - 1);
        assert_eq!(end.saturating_add_secs(10).as_secs(), u64::MAX);
    }

    #[test]
    fn test_from_datetime() {
        let dt = Utc.with_ymd_and_hms(2025, 12, 25, 14, 30, 0).unwrap();
        assert_eq!(Timestamp::from_datetime(&dt).as_secs(), 1_766_673_000);

        let before_epoch = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(Timestamp::from_datetime(&before_epoch), Timestamp::ZERO);
    }

    #[test]
    fn test_timestamp_serializes_as_seconds() {
        let json = serde_json::to_string(&Timestamp::from_secs(635)).unwrap();
        assert_eq!(json, "635");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m 1s");
    }

    #[test]
    fn test_format_datetime_full() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 45).unwrap();
        assert_eq!(format_datetime_full(&dt), "2025-12-25 14:30:45");
    }

    #[test]
    fn test_now_returns_time() {
        let t = now();
        assert!(t.year() >= 2020);
    }

    #[test]
    fn test_parse_mock_time_formats() {
        assert!(NaiveDateTime::parse_from_str("2025-12-25 14:30:00", MOCK_TIME_FORMAT).is_ok());

        for invalid in ["2025-12-25", "14:30:00", "2025-12-25T14:30:00", "", "not a date"] {
            assert!(
                NaiveDateTime::parse_from_str(invalid, MOCK_TIME_FORMAT).is_err(),
                "Expected '{}' to fail parsing",
                invalid
            );
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    fn test_is_mock_time_active_does_not_panic() {
        let _ = is_mock_time_active();
    }
}
