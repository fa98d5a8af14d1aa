//! Capped newest-first log buffers backing the dashboard panels.
//!
//! Heartbeats and alert dispatches are kept as short in-process session
//! histories. Nothing here persists across restarts.

use std::collections::VecDeque;
use std::sync::RwLock;

/// How many entries a session log keeps (matches the dashboard history).
pub const DEFAULT_CAPACITY: usize = 20;

/// A thread-safe ring of the most recent entries, newest first.
#[derive(Debug)]
pub struct RingLog<T> {
    entries: RwLock<VecDeque<T>>,
    capacity: usize,
}

impl<T: Clone> RingLog<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record an entry, evicting the oldest once the cap is reached.
    pub fn push(&self, entry: T) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push_front(entry);
            entries.truncate(self.capacity);
        }
    }

    /// Most recent entry, if any.
    pub fn latest(&self) -> Option<T> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.front().cloned())
    }

    /// All retained entries, newest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries
            .read()
            .ok()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for RingLog<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
