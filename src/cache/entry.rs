//! Cache Entry Module
//!
//! Defines a single stored payload together with the instant it was written.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored payload and its creation instant.
///
/// Entries are never mutated in place; `add` replaces them wholesale.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The stored payload
    pub payload: V,
    /// When the payload was written
    pub created_at: Instant,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates an entry stamped with the current instant.
    pub fn new(payload: V) -> Self {
        Self {
            payload,
            created_at: Instant::now(),
        }
    }

    // == Age ==
    /// Returns how long ago the entry was written, as seen from `now`.
    ///
    /// Saturates to zero if `now` precedes the creation instant.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Stale ==
    /// Checks whether the entry has outlived `interval`.
    ///
    /// An entry whose age equals the interval exactly is still fresh; it only
    /// becomes stale once the age is strictly greater.
    pub fn is_stale(&self, interval: Duration, now: Instant) -> bool {
        self.age(now) > interval
    }
}
