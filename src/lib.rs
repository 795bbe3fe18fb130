//! Pokecache - A concurrency-safe TTL cache and the Pokedex REPL built on it
//!
//! The cache memoizes upstream responses by URL; a background task sweeps out
//! entries older than the cache interval.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod repl;
mod tasks;

pub use cache::{CacheStats, ResponseCache, TtlCache};
pub use config::Config;
pub use error::{CacheError, FetchError};
pub use fetch::{get_cached_or_fetch, Fetcher, HttpFetcher};
