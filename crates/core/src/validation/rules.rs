//! Names of the built-in rules. A failing rule's name becomes the error code.

pub const REQUIRED: &str = "required";
pub const MIN_LEN: &str = "min_len";
pub const MAX_LEN: &str = "max_len";
pub const RANGE: &str = "range";
pub const ONE_OF: &str = "one_of";
pub const RESOURCE_NAME: &str = "resource_name";

/// Every rule a fresh [`Validator`](super::Validator) knows about.
pub const BUILT_IN: &[&str] = &[REQUIRED, MIN_LEN, MAX_LEN, RANGE, ONE_OF, RESOURCE_NAME];

/// Maximum length of a resource name (same as a DNS label).
pub const RESOURCE_NAME_MAX_LEN: usize = 63;

/// Lowercase alphanumerics and `-`, not starting or ending with `-`.
pub fn is_resource_name(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= RESOURCE_NAME_MAX_LEN
        && !value.starts_with('-')
        && !value.ends_with('-')
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
