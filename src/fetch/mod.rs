//! Page fetching
//!
//! `Session` is the cache handle every extractor receives: it pairs a
//! transport with a response cache and is passed explicitly, never held in
//! global state.
//!
//! ```text
//! Extractor ──▶ Session::fetch ──▶ HttpCache ──(miss)──▶ Transport
//!                    │                                       │
//!                    ▼                                       ▼
//!              Option<Page>                           body bytes (cached)
//! ```

pub mod cache;
pub mod transport;

pub use cache::HttpCache;
pub use transport::{HttpTransport, StaticTransport, Transport};

use tracing::{debug, error, instrument};

use crate::config::{CacheBackend, ScraperConfig};
use crate::error::{FetchError, Result};

/// A fetched HTML page
#[derive(Debug, Clone)]
pub struct Page {
    /// URL the page was requested from
    pub url: String,
    /// Body decoded as UTF-8
    pub body: String,
}

/// Cache-backed HTTP session
pub struct Session {
    transport: Box<dyn Transport>,
    cache: HttpCache,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session from a transport and a cache
    pub fn new(transport: impl Transport + 'static, cache: HttpCache) -> Self {
        Self {
            transport: Box::new(transport),
            cache,
        }
    }

    /// Create the production session described by `config`
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.request_timeout(), &config.user_agent)?;
        let cache = match config.cache.backend {
            CacheBackend::Memory => HttpCache::memory(),
            CacheBackend::Disk => HttpCache::disk(config.cache_path()),
        };
        Ok(Self::new(transport, cache))
    }

    /// The response cache
    pub fn cache(&self) -> &HttpCache {
        &self.cache
    }

    /// Fetch a page as text.
    ///
    /// Transport failures are logged and yield `None`; they never reach the
    /// caller as errors.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Option<Page> {
        match self.get(url).await {
            Ok(body) => Some(Page {
                url: url.to_string(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
            Err(e) => {
                error!(url, error = %e, "Error while loading page");
                None
            }
        }
    }

    /// Fetch raw bytes; failures propagate
    #[instrument(skip(self))]
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        Ok(self.get(url).await?)
    }

    /// Drop every cached response
    pub async fn clear_cache(&self) -> Result<()> {
        self.cache.clear().await
    }

    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        if let Some(body) = self.cache.get(url).await {
            debug!(url, "Cache hit");
            return Ok(body);
        }

        let body = self.transport.get(url).await?;
        self.cache.put(url, &body).await;
        Ok(body)
    }
}
