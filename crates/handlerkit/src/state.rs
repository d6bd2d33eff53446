//! Process-wide state shared by every wrapped route.
//!
//! Built once at startup. Everything inside is either immutable or
//! internally synchronized, so cloning per request is cheap.

use std::sync::Arc;

use handlerkit_core::{classify::StatusTable, lock::Locker, validation::Validator};

use crate::config::Config;

/// Shared pipeline state.
#[derive(Clone)]
pub struct PipelineState {
    /// Trace header and body limits.
    pub config: Arc<Config>,
    /// Code to status table used to classify failures.
    pub statuses: Arc<StatusTable>,
    /// Validator used by `RequestContext::load_body`.
    pub validator: Arc<Validator>,
    /// Lock service for namespace-guarded routes.
    pub locker: Arc<dyn Locker>,
}

impl PipelineState {
    /// State with the baseline status table and a fresh validator.
    pub fn new(config: Config, locker: Arc<dyn Locker>) -> Self {
        Self {
            config: Arc::new(config),
            statuses: Arc::new(StatusTable::baseline()),
            validator: Arc::new(Validator::new()),
            locker,
        }
    }

    pub fn with_statuses(mut self, statuses: StatusTable) -> Self {
        self.statuses = Arc::new(statuses);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Arc::new(validator);
        self
    }
}

impl std::fmt::Debug for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineState")
            .field("config", &self.config)
            .field("statuses", &self.statuses)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}
