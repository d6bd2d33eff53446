use thiserror::Error;

/// Code reported for every failure that carries no usable code.
pub const UNKNOWN_CODE: &str = "unknown";

/// A failure with a machine-readable code.
///
/// The code is looked up in the status table; the message is shown to the
/// client as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CodedError {
    pub code: String,
    pub message: String,
}

impl CodedError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// A failure under the fallback `unknown` code.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(UNKNOWN_CODE, message)
    }
}
