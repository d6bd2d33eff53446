//! Pure core for handlerkit - no I/O, no runtime, no side effects.
//!
//! This crate provides:
//! - Identity types carried through a request (`User`, `UserInfo`, ...)
//! - The error taxonomy (`CodedError`, `HandlerError`)
//! - The code to HTTP status table used to classify failures
//! - Response envelopes for each wire convention
//! - Field validation with named rules
//! - The lock contract consumed by lock-guarded routes
//!
//! # Example
//!
//! ```
//! use handlerkit_core::{classify::StatusTable, CodedError, HandlerError};
//!
//! let table = StatusTable::default();
//! let err = HandlerError::from(CodedError::new("not_found", "app not found"));
//!
//! let classification = table.classify(&err);
//! assert_eq!(classification.status, 404);
//! assert_eq!(classification.code, "not_found");
//! ```

pub mod classify;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod lock;
pub mod validation;

pub use envelope::Reply;
pub use error::{CodedError, HandlerError, HandlerResult, UNKNOWN_CODE};
pub use identity::{Domain, Role, User, UserInfo};
