//! Upstream HTTP client

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::FetchError;

// == Fetcher Trait ==
/// Retrieves the raw body behind a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

// == HTTP Fetcher ==
/// [`Fetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let request_error = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(request_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();

        // Port 9 (discard) on localhost is closed on any sane test machine.
        let result = fetcher.fetch("http://127.0.0.1:9/location-area/").await;

        assert!(matches!(result, Err(FetchError::Request { .. })));
    }

    #[tokio::test]
    async fn test_invalid_url_is_request_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();

        let result = fetcher.fetch("not a url").await;

        assert!(matches!(result, Err(FetchError::Request { .. })));
    }
}
