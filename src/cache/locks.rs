//! Per-key async mutual exclusion
//!
//! Lock entries are created on first use and dropped again once no caller
//! holds or waits on them, so the registry only grows with in-flight keys.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

type Entry = Arc<AsyncMutex<()>>;

/// Registry of locks keyed by string
#[derive(Debug, Default)]
pub struct KeyedLocks {
    entries: Mutex<HashMap<String, Entry>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `key`
    ///
    /// Callers sharing a key run one at a time; callers with different keys
    /// never wait on each other.
    pub async fn with_lock<F, Fut, T>(&self, key: &str, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        // Declared first so it drops after the mutex guard.
        let lease = Lease {
            registry: self,
            key,
            entry: self.checkout(key),
        };
        let _guard = lease.entry.lock().await;
        f().await
    }

    /// Number of keys with a live lock entry
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn checkout(&self, key: &str) -> Entry {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key.to_string()).or_default().clone()
    }

    fn release(&self, key: &str, entry: &Entry) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only taken under this map lock, so a count of two
        // (the map and this lease) means nobody else holds or awaits it.
        if Arc::strong_count(entry) == 2
            && entries.get(key).is_some_and(|e| Arc::ptr_eq(e, entry))
        {
            entries.remove(key);
        }
    }
}

/// Returns the entry to the registry even if the caller's future is dropped
struct Lease<'a> {
    registry: &'a KeyedLocks,
    key: &'a str,
    entry: Entry,
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.registry.release(self.key, &self.entry);
    }
}
