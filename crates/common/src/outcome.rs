//! Success/failure results for expected business outcomes.
//!
//! Commands and aggregate mutations never panic for a rejected input. They
//! return an [`Outcome`], which is either the produced value or a [`Failure`]
//! carrying an [`ErrorKind`] and a human-readable message. Because `Outcome`
//! is a plain [`Result`], pipelines compose with `?` and the first failure is
//! propagated with its message untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of a command or mutation. `Outcome` without a type parameter is the
/// unit result: success or failure with no payload.
pub type Outcome<T = ()> = std::result::Result<T, Failure>;

/// Classification of a recoverable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A caller-supplied value failed a local precondition.
    InvalidArgument,

    /// The operation is not allowed in the aggregate's current state.
    BusinessRuleViolation,

    /// The target aggregate does not exist.
    NotFound,

    /// The stored version moved on since the aggregate was loaded.
    ConcurrencyConflict,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::BusinessRuleViolation => "BusinessRuleViolation",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::ConcurrencyConflict => "ConcurrencyConflict",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The failure half of an [`Outcome`].
///
/// Displays as its message only, so wrapping layers that forward a failure
/// never alter the text a caller sees.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Failure {
    kind: ErrorKind,
    message: String,
}

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BusinessRuleViolation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn concurrency_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConcurrencyConflict, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true for failures the caller can fix by correcting its input,
    /// as opposed to missing targets or stale versions.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidArgument | ErrorKind::BusinessRuleViolation
        )
    }
}

/// Unit success, for operations that produce no value.
pub fn success() -> Outcome {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_positive(raw: &str) -> Outcome<u32> {
        let value: u32 = raw
            .parse()
            .map_err(|_| Failure::invalid_argument(format!("'{raw}' is not a number")))?;
        if value == 0 {
            return Err(Failure::invalid_argument("value must be positive"));
        }
        Ok(value)
    }

    fn double_then_cap(raw: &str) -> Outcome<u32> {
        let value = parse_positive(raw)?;
        if value > 100 {
            return Err(Failure::business_rule("value too large"));
        }
        Ok(value * 2)
    }

    #[test]
    fn success_carries_value_and_no_error() {
        let outcome = double_then_cap("21");
        assert!(outcome.is_ok());
        assert_eq!(outcome.as_ref().ok(), Some(&42));
        assert!(outcome.err().is_none());
    }

    #[test]
    fn failure_carries_error_and_no_value() {
        let outcome = double_then_cap("0");
        assert!(outcome.is_err());
        assert!(outcome.as_ref().ok().is_none());
        let failure = outcome.unwrap_err();
        assert_eq!(failure.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn pipeline_propagates_first_message_unchanged() {
        let failure = double_then_cap("abc").unwrap_err();
        assert_eq!(failure.to_string(), "'abc' is not a number");
        assert_eq!(failure.message(), "'abc' is not a number");
    }

    #[test]
    fn later_stage_failure_keeps_its_kind() {
        let failure = double_then_cap("500").unwrap_err();
        assert_eq!(failure.kind(), ErrorKind::BusinessRuleViolation);
        assert!(failure.is_bad_request());
    }

    #[test]
    fn unit_success() {
        assert_eq!(success(), Ok(()));
    }

    #[test]
    fn not_found_and_conflicts_are_not_bad_requests() {
        assert!(!Failure::not_found("missing").is_bad_request());
        assert!(!Failure::concurrency_conflict("stale").is_bad_request());
    }

    #[test]
    fn kind_display() {
        assert_eq!(ErrorKind::NotFound.to_string(), "NotFound");
    }
}
