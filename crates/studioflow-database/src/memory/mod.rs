//! In-memory store.
//!
//! Every trait method takes the single state lock for its whole body, so
//! multi-row writes are atomic and version numbers are serialized exactly
//! as the PostgreSQL row lock serializes them.

mod state;
mod stores;

use tokio::sync::Mutex;

use self::state::State;

/// Process-local implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests;
