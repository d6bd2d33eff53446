use async_trait::async_trait;

use crate::error::HandlerError;

/// Lock/unlock contract of an external lock service.
///
/// Errors from [`Locker::acquire`] are classified like any handler failure,
/// so a service reporting contention should return a coded error (the
/// baseline table maps `locked` to 423).
#[async_trait]
pub trait Locker: Send + Sync {
    /// Acquires `name`, returning the version token of this acquisition.
    async fn acquire(&self, name: &str, ttl: u64) -> Result<String, HandlerError>;

    /// Releases the acquisition identified by `version`.
    async fn release(&self, name: &str, version: &str);
}
