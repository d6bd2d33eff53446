use serde_json::Value;

use super::{Validator, Violation};

/// A decoded request body that can check itself.
pub trait Validate {
    /// Checks fields in declaration order and returns the first violation.
    fn validate(&self, validator: &Validator) -> Result<(), Violation>;

    /// Fills in declared defaults for omitted fields. Runs after a
    /// successful [`Validate::validate`].
    fn apply_defaults(&mut self) {}
}

/// Untyped bodies carry no rules.
impl Validate for Value {
    fn validate(&self, _validator: &Validator) -> Result<(), Violation> {
        Ok(())
    }
}
