//! Configuration Module
//!
//! Handles loading the Pokedex settings from environment variables.

use std::env;
use std::time::Duration;

use chrono::TimeDelta;

/// Default base URL of the upstream API
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Log filter used when `RUST_LOG` is unset; covers the library and the binary
pub const DEFAULT_LOG_FILTER: &str = "pokecache=info,pokedex=info";

/// Application configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL and sweep interval in seconds; negative values are rejected
    /// when the cache is built
    pub cache_interval: i64,
    /// Base URL of the upstream API, without a trailing slash
    pub base_url: String,
    /// Upstream request timeout in seconds
    pub fetch_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_INTERVAL` - Cache TTL in seconds (default: 10)
    /// - `POKEAPI_BASE_URL` - Upstream API root (default: https://pokeapi.co/api/v2)
    /// - `FETCH_TIMEOUT` - Request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_interval: parse_var("CACHE_INTERVAL").unwrap_or(defaults.cache_interval),
            base_url: env::var("POKEAPI_BASE_URL")
                .ok()
                .map(|url| normalize_base_url(&url))
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.base_url),
            fetch_timeout: parse_var("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
        }
    }

    /// Returns the cache interval as a signed duration.
    ///
    /// Values beyond the representable range saturate towards their own
    /// sign, so an out-of-range negative interval is still rejected later.
    pub fn cache_interval(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.cache_interval).unwrap_or(if self.cache_interval < 0 {
            TimeDelta::MIN
        } else {
            TimeDelta::MAX
        })
    }

    /// Returns the upstream request timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_interval: 10,
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_timeout: 10,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
