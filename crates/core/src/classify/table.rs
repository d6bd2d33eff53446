//! Pure code to status lookup, following the Functional Core pattern.
//!
//! A [`StatusTable`] is assembled once at startup and then only read. It is
//! shared between requests behind an `Arc` and never mutated after that.

use std::collections::HashMap;

use crate::error::{HandlerError, UNKNOWN_CODE};
use crate::validation::rules;

/// Status used for unknown and uncoded failures (Internal Server Error).
pub const FALLBACK_STATUS: u16 = 500;

/// Outcome of classifying one failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Code reported to the client; `unknown` when the table has no entry.
    pub code: String,
    /// HTTP status for the response.
    pub status: u16,
}

impl Classification {
    fn fallback() -> Self {
        Self {
            code: UNKNOWN_CODE.to_string(),
            status: FALLBACK_STATUS,
        }
    }
}

/// Static code to HTTP status table.
#[derive(Debug, Clone)]
pub struct StatusTable {
    statuses: HashMap<String, u16>,
}

impl Default for StatusTable {
    fn default() -> Self {
        Self::baseline()
    }
}

impl StatusTable {
    /// A table with no entries; everything classifies as `unknown`.
    pub fn empty() -> Self {
        Self {
            statuses: HashMap::new(),
        }
    }

    /// The baseline table: generic codes plus every built-in validation rule.
    ///
    /// - `unknown` -> 500
    /// - `bad_request` -> 400, `unauthorized` -> 401, `forbidden` -> 403
    /// - `not_found` -> 404, `conflict` -> 409, `locked` -> 423
    /// - `too_many_requests` -> 429, `unavailable` -> 503
    /// - validation rules (`required`, `min_len`, ...) -> 400
    pub fn baseline() -> Self {
        let table = Self::empty()
            .with(UNKNOWN_CODE, FALLBACK_STATUS)
            .with("bad_request", 400)
            .with("unauthorized", 401)
            .with("forbidden", 403)
            .with("not_found", 404)
            .with("conflict", 409)
            .with("locked", 423)
            .with("too_many_requests", 429)
            .with("unavailable", 503);

        rules::BUILT_IN
            .iter()
            .fold(table, |table, rule| table.with(*rule, 400))
    }

    /// Add or replace the status for a code.
    pub fn with(mut self, code: impl Into<String>, status: u16) -> Self {
        self.statuses.insert(code.into(), status);
        self
    }

    /// The status registered for a code, if any.
    pub fn status_of(&self, code: &str) -> Option<u16> {
        self.statuses.get(code).copied()
    }

    /// Classifies an optional code.
    ///
    /// Codes present in the table keep their code and get the registered
    /// status. Missing codes and codes absent from the table become
    /// `unknown` with [`FALLBACK_STATUS`].
    pub fn classify_code(&self, code: Option<&str>) -> Classification {
        match code.and_then(|c| self.status_of(c).map(|s| (c, s))) {
            Some((code, status)) => Classification {
                code: code.to_string(),
                status,
            },
            None => Classification::fallback(),
        }
    }

    /// Classifies a handler failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use handlerkit_core::{classify::StatusTable, CodedError, HandlerError};
    ///
    /// let table = StatusTable::empty().with("E404", 404);
    ///
    /// let known = HandlerError::from(CodedError::new("E404", "missing"));
    /// assert_eq!(table.classify(&known).status, 404);
    ///
    /// let panic = HandlerError::Panic("boom".to_string());
    /// assert_eq!(table.classify(&panic).code, "unknown");
    /// assert_eq!(table.classify(&panic).status, 500);
    /// ```
    pub fn classify(&self, error: &HandlerError) -> Classification {
        self.classify_code(error.code())
    }
}
