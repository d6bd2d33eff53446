use thiserror::Error;

use super::CodedError;

/// Every way a wrapped handler can fail.
///
/// Only [`HandlerError::Coded`] exposes a code; the other variants are
/// classified under the fallback code.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Domain failure carrying a lookup code.
    #[error(transparent)]
    Coded(#[from] CodedError),

    /// The request body was not well-formed JSON for the target type.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    /// The handler panicked; holds the panic payload rendered as a string.
    #[error("{0}")]
    Panic(String),

    /// Any foreign error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    /// Machine-readable code, if this error carries one.
    pub fn code(&self) -> Option<&str> {
        match self {
            HandlerError::Coded(e) => Some(&e.code),
            _ => None,
        }
    }
}
