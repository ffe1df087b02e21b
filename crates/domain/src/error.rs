//! Domain error types.

use common::{AggregateId, ErrorKind, Failure};
use event_store::{EventStoreError, Version};
use thiserror::Error;

/// Ways a stored history can fail to produce a valid aggregate.
///
/// Any of these means the stream or the code applying it is broken. They are
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptedHistory {
    #[error("history is empty")]
    Empty,

    #[error("expected version {expected}, found {found}")]
    VersionGap { expected: Version, found: Version },

    #[error("event for aggregate {found} in stream of {expected}")]
    ForeignEvent {
        expected: AggregateId,
        found: AggregateId,
    },

    #[error("replayed state violates invariants: {}", .violations.join("; "))]
    InvariantsViolated { violations: Vec<String> },
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An expected, recoverable failure. Displays as the failure's own message.
    #[error(transparent)]
    Rejected(#[from] Failure),

    /// A stored history could not be replayed. Fatal.
    #[error("Corrupted history for {aggregate_type} {aggregate_id}: {source}")]
    CorruptedHistory {
        aggregate_type: &'static str,
        aggregate_id: AggregateId,
        #[source]
        source: CorruptedHistory,
    },

    /// An event store error other than a version conflict.
    #[error("Event store error: {0}")]
    EventStore(EventStoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Returns the failure kind for recoverable errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            DomainError::Rejected(failure) => Some(failure.kind()),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            DomainError::Rejected(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns true if retrying cannot help.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::CorruptedHistory { .. })
    }
}

impl From<EventStoreError> for DomainError {
    fn from(err: EventStoreError) -> Self {
        match err {
            EventStoreError::ConcurrencyConflict { .. } => {
                DomainError::Rejected(Failure::concurrency_conflict(err.to_string()))
            }
            EventStoreError::AggregateNotFound(_) => {
                DomainError::Rejected(Failure::not_found(err.to_string()))
            }
            EventStoreError::Serialization(source) => DomainError::Serialization(source),
            other => DomainError::EventStore(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_failure_message_unchanged() {
        let err = DomainError::from(Failure::invalid_argument("name cannot be empty"));
        assert_eq!(err.to_string(), "name cannot be empty");
        assert_eq!(err.kind(), Some(ErrorKind::InvalidArgument));
        assert!(!err.is_fatal());
    }

    #[test]
    fn store_conflict_becomes_recoverable_failure() {
        let err = DomainError::from(EventStoreError::ConcurrencyConflict {
            aggregate_id: AggregateId::new(),
            expected: Version::first(),
            actual: Version::new(2),
        });
        assert_eq!(err.kind(), Some(ErrorKind::ConcurrencyConflict));
    }

    #[test]
    fn corrupted_history_is_fatal() {
        let err = DomainError::CorruptedHistory {
            aggregate_type: "Customer",
            aggregate_id: AggregateId::new(),
            source: CorruptedHistory::Empty,
        };
        assert!(err.is_fatal());
        assert!(err.kind().is_none());
    }

    #[test]
    fn invariant_violations_are_listed() {
        let corrupted = CorruptedHistory::InvariantsViolated {
            violations: vec!["name cannot be empty".to_string(), "email is required".to_string()],
        };
        assert_eq!(
            corrupted.to_string(),
            "replayed state violates invariants: name cannot be empty; email is required"
        );
    }
}
