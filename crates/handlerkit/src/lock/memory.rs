//! In-memory lock service for testing and the demo server.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use handlerkit_core::{lock::Locker, CodedError, HandlerError};

#[derive(Debug, Clone)]
struct Held {
    version: String,
    /// `None` holds until released.
    expires_at: Option<Instant>,
}

impl Held {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// In-memory lock store.
///
/// Acquisition never waits: a name that is already held fails with the
/// `locked` code. A TTL of zero holds until released; any other TTL is in
/// seconds. Locks are not shared across processes.
#[derive(Debug, Clone)]
pub struct MemoryLocker {
    locks: Arc<RwLock<HashMap<String, Held>>>,
}

impl Default for MemoryLocker {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLocker {
    /// Creates an empty lock store.
    pub fn new() -> Self {
        Self {
            locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Whether `name` is currently held.
    pub async fn is_held(&self, name: &str) -> bool {
        let locks = self.locks.read().await;
        locks
            .get(name)
            .is_some_and(|held| held.is_live(Instant::now()))
    }
}

#[async_trait]
impl Locker for MemoryLocker {
    async fn acquire(&self, name: &str, ttl: u64) -> Result<String, HandlerError> {
        let now = Instant::now();
        let mut locks = self.locks.write().await;

        if locks.get(name).is_some_and(|held| held.is_live(now)) {
            return Err(CodedError::new("locked", format!("'{name}' is locked")).into());
        }

        let version = Uuid::new_v4().to_string();
        let expires_at = (ttl > 0).then(|| now + Duration::from_secs(ttl));
        locks.insert(
            name.to_string(),
            Held {
                version: version.clone(),
                expires_at,
            },
        );

        tracing::debug!(lock = %name, %version, "lock acquired");
        Ok(version)
    }

    async fn release(&self, name: &str, version: &str) {
        let mut locks = self.locks.write().await;
        match locks.get(name) {
            Some(held) if held.version == version => {
                locks.remove(name);
                tracing::debug!(lock = %name, %version, "lock released");
            }
            _ => tracing::warn!(lock = %name, %version, "release of a lock not held"),
        }
    }
}
