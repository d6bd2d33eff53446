//! Namespace locking around wrapped handlers and router subtrees.

mod guard;
mod lease;
mod memory;

pub use guard::guard;
pub use handlerkit_core::lock::{lock_name, Locker, ACQUIRE_TTL, LOCK_PREFIX};
pub use lease::LockLease;
pub use memory::MemoryLocker;
