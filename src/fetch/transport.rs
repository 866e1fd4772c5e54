//! HTTP transports
//!
//! `Transport` is the seam between the session and the network. The
//! production implementation wraps a `reqwest::Client`; `StaticTransport`
//! serves canned bodies and counts calls, for offline runs and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use crate::error::{FetchError, Result};

/// Something that can GET a URL and hand back the body bytes
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET. Non-success statuses are errors.
    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client with the given timeout and User-Agent
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Transport {
                url: String::new(),
                message: format!("{:#}", anyhow::Error::new(e)),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self))]
    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let transport_error = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: format!("{:#}", anyhow::Error::new(e)),
        };

        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(transport_error)?;
        debug!(bytes = body.len(), %status, "Response received");
        Ok(body.to_vec())
    }
}

/// Transport that serves fixed bodies keyed by URL
///
/// Unknown URLs fail like an unreachable host. Every call is counted,
/// cached or not, so callers can tell cache hits from network reads.
#[derive(Debug, Default)]
pub struct StaticTransport {
    pages: RwLock<HashMap<String, Vec<u8>>>,
    calls: AtomicUsize,
}

impl StaticTransport {
    /// Empty transport; every request fails
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body for `url`
    pub fn with_page(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(url, body);
        self
    }

    /// Register or replace a body for `url`
    pub fn insert(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.pages.write().insert(url.into(), body.into());
    }

    /// Number of `get` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.pages
            .read()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Transport {
                url: url.to_string(),
                message: "no route to host".to_string(),
            })
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        (**self).get(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_transport_serves_and_counts() {
        let transport = StaticTransport::new().with_page("https://a.test/", "hello");

        assert_eq!(transport.get("https://a.test/").await.unwrap(), b"hello");
        assert!(transport.get("https://b.test/").await.is_err());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_http_transport_rejects_error_status() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5), "test-agent").unwrap();
        let err = transport
            .get(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_http_transport_unreachable() {
        let transport = HttpTransport::new(Duration::from_secs(2), "test-agent").unwrap();
        let err = transport.get("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
