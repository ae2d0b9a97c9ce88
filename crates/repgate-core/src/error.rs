//! Error types for the access core

use repgate_api::{AccessState, WorkoutKind};
use repgate_util::{TargetId, Timestamp};
use std::fmt;
use thiserror::Error;

/// Mutating operation named in a rejected transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    StartWorkout,
    CompleteWorkout,
    CancelWorkout,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::StartWorkout => f.write_str("start a workout"),
            Operation::CompleteWorkout => f.write_str("complete a workout"),
            Operation::CancelWorkout => f.write_str("cancel a workout"),
        }
    }
}

/// Contract violations reported by the access controller
///
/// A call that fails with any of these has no effect on the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Cannot {operation} while {state}")]
    InvalidTransition {
        operation: Operation,
        state: AccessState,
    },

    #[error("No workout in progress to complete")]
    NoPendingWorkout,

    #[error("{kind} workout earns no unlock time")]
    ZeroEarnedTime { kind: WorkoutKind },

    #[error("Time went backwards: {now} is earlier than last observed {last}")]
    OutOfOrderTime { now: Timestamp, last: Timestamp },

    #[error("Malformed target catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Malformed target catalog passed to a resolver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("target at position {index} has an empty identifier")]
    EmptyIdentifier { index: usize },

    #[error("duplicate target identifier: {0}")]
    DuplicateIdentifier(TargetId),
}

pub type AccessResult<T> = Result<T, AccessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_violation() {
        let err = AccessError::InvalidTransition {
            operation: Operation::StartWorkout,
            state: AccessState::Unlocked,
        };
        assert_eq!(err.to_string(), "Cannot start a workout while unlocked");

        let err = AccessError::OutOfOrderTime {
            now: Timestamp::from_secs(3),
            last: Timestamp::from_secs(10),
        };
        assert!(err.to_string().contains("t=3s"));

        let err: AccessError = CatalogError::DuplicateIdentifier(TargetId::new("a")).into();
        assert!(matches!(err, AccessError::Catalog(_)));
    }
}
