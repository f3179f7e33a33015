//! Shared cells for heap values.
//!
//! Collections, iterators, thread records and captured arrays sit behind a
//! `parking_lot` lock. Those locks never poison, so a builtin that fails in
//! the middle of an update leaves the value usable.

pub use parking_lot::RwLock;
pub use std::sync::Arc;

/// Reference-counted, lock-guarded value
pub type Shared<T> = Arc<RwLock<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}
