//! Failure classification: maps error codes to HTTP status codes.

mod table;

pub use table::{Classification, StatusTable, FALLBACK_STATUS};
