//! Field validation for decoded request bodies.
//!
//! Validation runs against an explicit [`Validator`] built at startup. Types
//! describe their own checks through [`Validate`] and stop at the first
//! failing field.

pub mod rules;
mod traits;
mod validator;
mod violation;

pub use traits::Validate;
pub use validator::Validator;
pub use violation::Violation;
