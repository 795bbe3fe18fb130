//! Error types for the cache and its collaborators
//!
//! Provides unified error handling using thiserror.

use chrono::TimeDelta;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised while constructing a cache.
///
/// Once a cache exists, every operation on it is total: a missing key is
/// reported as `None`, never as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The TTL interval was negative
    #[error("Invalid cache interval: {0} is negative")]
    InvalidInterval(TimeDelta),

    /// The sweep task could not be spawned because no Tokio runtime is running
    #[error("Cache requires a running Tokio runtime")]
    NoRuntime,
}

// == Fetch Error Enum ==
/// Errors raised by the fetch-or-cache layer.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP client could not be constructed
    #[error("Could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// Transport-level failure (connect, timeout, body read)
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status
    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Payload (fresh or cached) did not match the expected shape
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Decoded value could not be re-encoded for caching
    #[error("Could not encode response from {url} for caching: {source}")]
    Encode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

// == Result Type Alias ==
/// Convenience Result type for cache construction.
pub type Result<T> = std::result::Result<T, CacheError>;
