//! Contract for the distributed lock service guarding namespace-scoped routes.

mod traits;

pub use traits::Locker;

/// Prefix of every namespace lock name.
pub const LOCK_PREFIX: &str = "namespace_";

/// TTL passed on every acquisition. What zero means is up to the lock service.
pub const ACQUIRE_TTL: u64 = 0;

/// Lock name for a namespace; an unset namespace locks `namespace_`.
pub fn lock_name(namespace: &str) -> String {
    format!("{LOCK_PREFIX}{namespace}")
}
