use thiserror::Error;

use crate::error::{CodedError, HandlerError};

/// The first field that failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid field '{field}': {message}")]
pub struct Violation {
    /// Name of the failing rule, used as the error code.
    pub rule: String,
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(rule: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<Violation> for CodedError {
    fn from(violation: Violation) -> Self {
        let message = violation.to_string();
        CodedError::new(violation.rule, message)
    }
}

impl From<Violation> for HandlerError {
    fn from(violation: Violation) -> Self {
        HandlerError::Coded(violation.into())
    }
}
