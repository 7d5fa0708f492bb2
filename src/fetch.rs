use std::time::Duration;

use async_trait::async_trait;

use crate::config::ServiceConfig;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Request(String),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
}

// ── Fetched payload ──────────────────────────────────────────────────────────

/// Raw bytes of a downloaded resource plus the Content-Type it was served with.
#[derive(Debug, Clone)]
pub struct FetchedContent {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

// ── Fetcher seam ─────────────────────────────────────────────────────────────

/// HTTP access used by the pipelines. Backed by reqwest in production and by
/// in-memory stubs in tests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a URL and decode the body as text.
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;

    /// Fetch a URL and return the raw body bytes with their Content-Type.
    async fn fetch_bytes(&self, url: &str, timeout: Duration)
        -> Result<FetchedContent, FetchError>;
}

// ── reqwest-backed implementation ────────────────────────────────────────────

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &ServiceConfig) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_str(&config.accept)
                .map_err(|e| FetchError::Request(e.to_string()))?,
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_str(&config.accept_language)
                .map_err(|e| FetchError::Request(e.to_string()))?,
        );
        headers.insert(
            reqwest::header::HeaderName::from_static("dnt"),
            reqwest::header::HeaderValue::from_static("1"),
        );
        headers.insert(
            reqwest::header::CONNECTION,
            reqwest::header::HeaderValue::from_static("keep-alive"),
        );

        let client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self { client })
    }

    async fn send(&self, url: &str, timeout: Duration) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(format!("TimeoutError: {}", e))
                } else if e.is_connect() {
                    FetchError::Request(format!("ConnectError: {}", e))
                } else {
                    FetchError::Request(format!("RequestError: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let response = self.send(url, timeout).await?;
        response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))
    }

    async fn fetch_bytes(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<FetchedContent, FetchError> {
        let response = self.send(url, timeout).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?
            .to_vec();
        Ok(FetchedContent { content_type, bytes })
    }
}
