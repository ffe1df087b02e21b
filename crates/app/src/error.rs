//! Application error type and its client-facing classification.

use common::ErrorKind;
use domain::DomainError;
use thiserror::Error;

/// How a caller at the edge of the system should treat an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    BadRequest,
    NotFound,
    /// The caller should reload and retry.
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    pub fn class(&self) -> ErrorClass {
        let AppError::Domain(err) = self;
        match err.kind() {
            Some(ErrorKind::InvalidArgument | ErrorKind::BusinessRuleViolation) => {
                ErrorClass::BadRequest
            }
            Some(ErrorKind::NotFound) => ErrorClass::NotFound,
            Some(ErrorKind::ConcurrencyConflict) => ErrorClass::Conflict,
            None => {
                tracing::error!(error = %err, fatal = err.is_fatal(), "internal error");
                ErrorClass::Internal
            }
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        let AppError::Domain(err) = self;
        err.kind()
    }
}
