//! Per-key coalescing for the paid tier.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed async locks.
///
/// Concurrent requests for one key serialize on its entry: the first
/// holder makes the remote call, and everyone queued behind it re-checks
/// the pattern store once the lock is theirs. Entries for idle keys are
/// reclaimed through [`KeyedFlights::release`].
pub struct KeyedFlights {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedFlights {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Take the flight lock for `key`, waiting behind any current holder.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the entry for `key` unless someone still holds or awaits its
    /// lock. A guard or a queued waiter keeps a clone of the `Arc`, so
    /// the map's copy being the last reference means the key is idle.
    pub fn release(&self, key: &str) {
        self.locks
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

impl Default for KeyedFlights {
    fn default() -> Self {
        Self::new()
    }
}
