//! Fetch Module
//!
//! Retrieval of upstream payloads, memoized through a [`ResponseCache`].
//!
//! The cache itself never fetches anything: callers look a URL up, and on a
//! miss retrieve it through a [`Fetcher`] and add the result under the same
//! URL. Concurrent misses for one URL are not deduplicated; each caller
//! fetches and the last `add` wins.

mod client;
#[cfg(test)]
pub(crate) mod stub;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::ResponseCache;
use crate::error::FetchError;

pub use client::{Fetcher, HttpFetcher};

/// Returns the payload at `url` decoded as `T`, from the cache when possible.
///
/// On a miss the body is fetched and decoded, then re-encoded as compact JSON
/// and cached under `url`, so only the fields of `T` are kept in memory.
///
/// # Errors
/// Fetch failures and payloads (fresh or cached) that do not decode as `T`.
pub async fn get_cached_or_fetch<T, F>(
    cache: &ResponseCache,
    fetcher: &F,
    url: &str,
) -> Result<T, FetchError>
where
    T: DeserializeOwned + Serialize,
    F: Fetcher + ?Sized,
{
    if let Some(cached) = cache.get(url).await {
        debug!("Cache hit for {}", url);
        return decode(url, &cached);
    }

    debug!("Cache miss for {}, fetching", url);
    let body = fetcher.fetch(url).await?;
    let value: T = decode(url, &body)?;

    let encoded = serde_json::to_vec(&value).map_err(|source| FetchError::Encode {
        url: url.to_string(),
        source,
    })?;
    cache.add(url, Bytes::from(encoded)).await;

    Ok(value)
}

fn decode<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}
