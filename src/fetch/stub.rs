//! In-memory [`Fetcher`] for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use super::Fetcher;
use crate::error::FetchError;

/// Serves fixed bodies per URL and counts requests. Unknown URLs get a 404.
#[derive(Debug, Default)]
pub(crate) struct StubFetcher {
    routes: HashMap<String, &'static str>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, url: impl Into<String>, body: &'static str) -> Self {
        self.routes.insert(url.into(), body);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.routes.get(url) {
            Some(body) => Ok(Bytes::from_static(body.as_bytes())),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
