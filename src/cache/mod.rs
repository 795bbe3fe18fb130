//! Cache Module
//!
//! Provides an in-memory cache whose entries expire after a fixed interval.

use std::time::Duration;

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::Entry;
pub use stats::CacheStats;
pub use store::{ResponseCache, TtlCache};

pub(crate) use store::SharedState;
#[cfg(test)]
pub(crate) use store::CacheState;

// == Public Constants ==
/// Shortest sweep period a cache will run with
pub const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(1);
