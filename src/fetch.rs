//! Cache-backed page fetching.
//!
//! `PageFetcher` is a pure memoization layer: the first request for a URL goes
//! to the network, every later one is answered from the cache. There is no
//! freshness check.

use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder};
use tracing::{debug, info, warn};

use crate::cache::{CacheMap, ResponseCache};
use crate::error::Result;

const USER_AGENT: &str = concat!("nps-explorer/", env!("CARGO_PKG_VERSION"));

/// A completed HTTP exchange. The status is kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking GET transport.
pub trait HttpGet {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

impl<T: HttpGet + ?Sized> HttpGet for &T {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        (**self).get(url)
    }
}

/// `HttpGet` over a shared reqwest blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestHttp {
    client: Client,
}

impl ReqwestHttp {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpGet for ReqwestHttp {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

pub struct PageFetcher<H> {
    http: H,
    store: ResponseCache,
    entries: CacheMap,
}

impl<H: HttpGet> PageFetcher<H> {
    /// Loads the cache document once; a missing or corrupt file starts empty.
    pub fn new(http: H, store: ResponseCache) -> Self {
        let entries = store.load_or_empty();
        Self::with_entries(http, store, entries)
    }

    pub fn with_entries(http: H, store: ResponseCache, entries: CacheMap) -> Self {
        Self { http, store, entries }
    }

    pub fn entries(&self) -> &CacheMap {
        &self.entries
    }

    pub fn is_cached(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Drops any cached body for `url` and fetches it again.
    pub fn refetch(&mut self, url: &str) -> Result<String> {
        if self.entries.remove(url).is_some() {
            debug!(url, "Dropped cache entry");
        }
        self.fetch(url)
    }

    /// Returns the body for `url`, going to the network only on a cache miss.
    ///
    /// Non-2xx bodies are returned and cached like any other; only transport
    /// failures are errors. A failed cache write is logged and the body is
    /// still returned.
    pub fn fetch(&mut self, url: &str) -> Result<String> {
        if let Some(body) = self.entries.get(url) {
            debug!(url, "Using cache");
            return Ok(body.clone());
        }

        info!(url, "Fetching");
        let response = self.http.get(url)?;
        if !response.is_success() {
            warn!(
                url,
                status = response.status,
                cache = %self.store.path().display(),
                "Caching non-success response; remove this url's entry from the cache file to retry"
            );
        }

        self.entries.insert(url.to_string(), response.body.clone());
        if let Err(e) = self.store.save(&self.entries) {
            warn!(url, error = %e, "Cache write failed");
        }
        Ok(response.body)
    }
}
