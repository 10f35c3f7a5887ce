//! Readiness Tracker - reactive map from subscription name to ready state.

use std::cell::RefCell;
use std::collections::HashMap;

use spark_signals::{Signal, signal};

/// Reactive mapping from subscription name to boolean ready state.
///
/// Entries are created lazily by the subscription manager, and only for
/// subscriptions whose handle supports the readiness query.
#[derive(Default)]
pub struct ReadinessTracker {
    entries: RefCell<HashMap<String, Signal<bool>>>,
}

impl ReadinessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the entry for `key` if absent, else update it.
    pub fn set_ready(&self, key: &str, value: bool) {
        // Clone the signal out of the map before setting: the set re-runs
        // dependent effects synchronously, and those may read the tracker.
        let entry = {
            let mut entries = self.entries.borrow_mut();
            entries
                .entry(key.to_string())
                .or_insert_with(|| signal(value))
                .clone()
        };
        entry.set(value);
    }

    /// Reactive read of the ready state for `key`.
    ///
    /// Absent keys read as `false` and do not become reactive until the
    /// first `set_ready` for that key.
    pub fn is_ready(&self, key: &str) -> bool {
        let entry = self.entries.borrow().get(key).cloned();
        match entry {
            Some(entry) => entry.get(),
            None => false,
        }
    }

    /// Whether an entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}
