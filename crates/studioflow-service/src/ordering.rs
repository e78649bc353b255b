//! Striped async locks that serialize commit-and-publish per ordering key.
//!
//! A service holds the stripe for an event's ordering key from before its
//! store write until the events have been handed to the sink. Two commits
//! for the same deliverable therefore reach the dispatch queue in the
//! order they reached the store.

use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Default number of stripes.
pub const DEFAULT_STRIPES: usize = 64;

/// Fixed set of mutexes addressed by key.
#[derive(Debug)]
pub struct KeyedLocks {
    stripes: Vec<Mutex<()>>,
}

impl KeyedLocks {
    /// Creates `stripes` locks (at least one).
    pub fn new(stripes: usize) -> Self {
        let stripes = (0..stripes.max(1)).map(|_| Mutex::new(())).collect();
        Self { stripes }
    }

    /// Waits for the stripe that owns `key`.
    ///
    /// Callers must not hold another stripe while acquiring one.
    pub async fn lock(&self, key: Uuid) -> MutexGuard<'_, ()> {
        self.stripes[self.index(key)].lock().await
    }

    fn index(&self, key: Uuid) -> usize {
        (key.as_u128() % self.stripes.len() as u128) as usize
    }
}

impl Default for KeyedLocks {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}
