//! Poison-tolerant lock acquisition.
//!
//! A panic while a cache guard is held must not take every later render
//! down with it. Cached values are replaceable, so recovery takes the
//! inner state and carries on; the worst outcome is one stale entry
//! inside the TTL bound.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

pub(crate) fn read_guard<'a, T>(lock: &'a RwLock<T>, slot: &'static str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!(slot, access = "read", "cache lock poisoned, reusing inner value");
        poisoned.into_inner()
    })
}

pub(crate) fn write_guard<'a, T>(
    lock: &'a RwLock<T>,
    slot: &'static str,
) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!(slot, access = "write", "cache lock poisoned, reusing inner value");
        poisoned.into_inner()
    })
}

pub(crate) fn queue_guard<'a, T>(lock: &'a Mutex<T>, op: &'static str) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!(op, "event queue lock poisoned, reusing inner value");
        poisoned.into_inner()
    })
}
