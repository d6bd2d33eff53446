use std::env;

use axum::http::HeaderName;
use thiserror::Error;

/// Header carrying the trace id when `TRACE_HEADER` is not set.
pub const DEFAULT_TRACE_HEADER: &str = "x-trace-id";

/// Largest request body `load_body` will read (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid trace header name '{0}'")]
    InvalidTraceHeader(String),
}

/// Pipeline configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Transport header read and echoed for the trace id.
    pub trace_header: HeaderName,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TRACE_HEADER` - Trace id header name (default: "x-trace-id")
    /// - `BODY_LIMIT_BYTES` - Maximum request body size (default: 2 MiB)
    pub fn from_env() -> Result<Self, ConfigError> {
        let trace_header = env::var("TRACE_HEADER")
            .unwrap_or_else(|_| DEFAULT_TRACE_HEADER.to_string());

        let body_limit = env::var("BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_BODY_LIMIT);

        Self::default()
            .with_trace_header(&trace_header)
            .map(|config| config.with_body_limit(body_limit))
    }

    /// Use a different trace header.
    pub fn with_trace_header(mut self, name: &str) -> Result<Self, ConfigError> {
        self.trace_header = HeaderName::try_from(name)
            .map_err(|_| ConfigError::InvalidTraceHeader(name.to_string()))?;
        Ok(self)
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_header: HeaderName::from_static(DEFAULT_TRACE_HEADER),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}
