//! Per-key request coalescing.
//!
//! Concurrent cache misses for the same key would each fetch the same
//! upstream content; holding a per-key async lock across the read-or-fetch
//! sequence collapses them into one download.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// A map of named async locks, created on first use.
///
/// Entries are never evicted; the key space is bounded by the number of
/// distinct (type, version, language) / (version, type, filename) tuples
/// a process touches.
#[derive(Debug, Default)]
pub(crate) struct KeyedLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, waiting if another task holds it.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.inner.lock().await;
            map.entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        slot.lock_owned().await
    }
}
