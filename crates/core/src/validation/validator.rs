use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::rules::{self, is_resource_name};
use super::Violation;

type Check = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone)]
struct NamedRule {
    check: Check,
    message: String,
}

/// Validation engine shared by every request.
///
/// Built once at startup, then only read. Holds the named string rules on
/// top of the built-in checks.
#[derive(Clone)]
pub struct Validator {
    named: HashMap<String, NamedRule>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.named.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Validator").field("named", &names).finish()
    }
}

impl Validator {
    /// A validator with the built-in named rules registered.
    pub fn new() -> Self {
        Self {
            named: HashMap::new(),
        }
        .register(
            rules::RESOURCE_NAME,
            "must be lowercase alphanumerics or '-', at most 63 characters",
            is_resource_name,
        )
    }

    /// Register a named rule, replacing any rule with the same name.
    pub fn register<F>(mut self, name: impl Into<String>, message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.named.insert(
            name.into(),
            NamedRule {
                check: Arc::new(check),
                message: message.into(),
            },
        );
        self
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Non-blank string.
    pub fn required(&self, field: &str, value: &str) -> Result<(), Violation> {
        if value.trim().is_empty() {
            return Err(Violation::new(rules::REQUIRED, field, "must not be empty"));
        }
        Ok(())
    }

    /// Present optional value.
    pub fn required_some<T>(&self, field: &str, value: Option<&T>) -> Result<(), Violation> {
        match value {
            Some(_) => Ok(()),
            None => Err(Violation::new(rules::REQUIRED, field, "is required")),
        }
    }

    /// At least `min` characters.
    pub fn min_len(&self, field: &str, value: &str, min: usize) -> Result<(), Violation> {
        if value.chars().count() < min {
            return Err(Violation::new(
                rules::MIN_LEN,
                field,
                format!("must be at least {min} characters"),
            ));
        }
        Ok(())
    }

    /// At most `max` characters.
    pub fn max_len(&self, field: &str, value: &str, max: usize) -> Result<(), Violation> {
        if value.chars().count() > max {
            return Err(Violation::new(
                rules::MAX_LEN,
                field,
                format!("must be at most {max} characters"),
            ));
        }
        Ok(())
    }

    /// Inclusive numeric range.
    pub fn range(&self, field: &str, value: i64, min: i64, max: i64) -> Result<(), Violation> {
        if value < min || value > max {
            return Err(Violation::new(
                rules::RANGE,
                field,
                format!("must be between {min} and {max}"),
            ));
        }
        Ok(())
    }

    /// One of a fixed set of strings.
    pub fn one_of(&self, field: &str, value: &str, options: &[&str]) -> Result<(), Violation> {
        if !options.contains(&value) {
            return Err(Violation::new(
                rules::ONE_OF,
                field,
                format!("must be one of [{}]", options.join(", ")),
            ));
        }
        Ok(())
    }

    /// Run a named rule. Unregistered names always fail under their own name.
    pub fn rule(&self, name: &str, field: &str, value: &str) -> Result<(), Violation> {
        let Some(rule) = self.named.get(name) else {
            return Err(Violation::new(name, field, "validation rule is not registered"));
        };

        if (rule.check)(value) {
            Ok(())
        } else {
            Err(Violation::new(name, field, rule.message.clone()))
        }
    }
}
