use std::sync::Arc;

use handlerkit_core::{
    lock::{lock_name, Locker, ACQUIRE_TTL},
    HandlerError,
};
use tokio::task::JoinHandle;

/// One successful acquisition of a namespace lock.
///
/// Released exactly once. The release always runs on its own task, so
/// dropping the request future (explicitly, or while
/// [`LockLease::release`] is pending) cannot cut it short.
pub struct LockLease {
    locker: Arc<dyn Locker>,
    name: String,
    /// Taken when the release task is spawned.
    version: Option<String>,
}

impl LockLease {
    /// Acquires the lock of `namespace` (the empty namespace when unset).
    pub async fn acquire(locker: Arc<dyn Locker>, namespace: &str) -> Result<Self, HandlerError> {
        let name = lock_name(namespace);
        let version = locker.acquire(&name, ACQUIRE_TTL).await?;
        Ok(Self {
            locker,
            name,
            version: Some(version),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Releases the lock and waits for the lock service to confirm.
    pub async fn release(mut self) {
        let Some(task) = self.spawn_release() else {
            return;
        };
        if let Err(e) = task.await {
            tracing::warn!(lock = %self.name, error = %e, "lock release task failed");
        }
    }

    fn spawn_release(&mut self) -> Option<JoinHandle<()>> {
        let version = self.version.take()?;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let locker = Arc::clone(&self.locker);
                let name = self.name.clone();
                Some(handle.spawn(async move {
                    locker.release(&name, &version).await;
                }))
            }
            Err(_) => {
                tracing::warn!(lock = %self.name, %version, "lock lease dropped outside a runtime");
                None
            }
        }
    }
}

impl Drop for LockLease {
    fn drop(&mut self) {
        // Detached; the task finishes on its own.
        let _ = self.spawn_release();
    }
}

impl std::fmt::Debug for LockLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockLease")
            .field("name", &self.name)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
