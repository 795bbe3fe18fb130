//! Cache Statistics Module
//!
//! Tracks lookup outcomes and sweeper activity.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing how a cache has been used.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that found a payload
    pub hits: u64,
    /// Number of lookups that found nothing
    pub misses: u64,
    /// Number of sweep ticks that have run
    pub sweeps: u64,
    /// Number of entries removed by the sweeper
    pub swept: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Sweep ==
    /// Counts one sweep tick and the entries it removed.
    pub(crate) fn record_sweep(&mut self, removed: usize) {
        self.sweeps += 1;
        self.swept += removed as u64;
    }
}
