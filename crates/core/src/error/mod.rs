mod coded;
mod handler;

pub use coded::{CodedError, UNKNOWN_CODE};
pub use handler::HandlerError;

/// What a wrapped handler returns.
pub type HandlerResult = std::result::Result<crate::envelope::Reply, HandlerError>;
