use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::config::ServiceConfig;
use crate::engine::SearchEngine;
use crate::extract;
use crate::fetch::{FetchError, Fetcher};
use crate::models::{ImageResult, PageResult};
use crate::throttle::Throttle;

// ── Skip accounting ──────────────────────────────────────────────────────────

/// Why an individual candidate produced no result. Skips are logged and the
/// pipeline moves on to the next candidate.
#[derive(Debug, thiserror::Error)]
enum SkipReason {
    #[error("search engine asset host")]
    AssetHost,
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("content type {0:?} is not an image")]
    NotImage(String),
}

// ── Service ──────────────────────────────────────────────────────────────────

/// The search and scrape pipelines behind the HTTP handlers.
///
/// Holds one client stack for the lifetime of the process. Both pipelines
/// degrade rather than fail: an unreachable search engine or a bad candidate
/// shrinks the result list, it never produces an error response.
pub struct SearchService {
    config: ServiceConfig,
    fetcher: Arc<dyn Fetcher>,
    engine: Arc<dyn SearchEngine>,
    throttle: Arc<dyn Throttle>,
}

impl SearchService {
    pub fn new(
        config: ServiceConfig,
        fetcher: Arc<dyn Fetcher>,
        engine: Arc<dyn SearchEngine>,
        throttle: Arc<dyn Throttle>,
    ) -> Self {
        Self {
            config,
            fetcher,
            engine,
            throttle,
        }
    }

    /// Search for images matching `query` and download up to `num_images` of
    /// them, returning each as a base64 data URL alongside its source URL.
    pub async fn search_images(&self, query: &str, num_images: usize) -> Vec<ImageResult> {
        let search_url = self.engine.image_search_url(query);
        let html = match self
            .fetcher
            .fetch_text(&search_url, self.config.search_timeout())
            .await
        {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("image search request failed: {}", e);
                return Vec::new();
            }
        };

        let candidates = self.engine.extract_image_candidates(&html);
        tracing::debug!("found {} image candidates for '{}'", candidates.len(), query);

        let mut results = Vec::new();
        for candidate in candidates {
            if results.len() >= num_images {
                break;
            }
            match self.download_image(&candidate).await {
                Ok(image) => {
                    results.push(image);
                    self.throttle.wait(self.config.image_delay_ms).await;
                }
                Err(reason) => {
                    tracing::debug!("skipping image candidate {}: {}", candidate, reason);
                }
            }
        }
        results
    }

    async fn download_image(&self, url: &str) -> Result<ImageResult, SkipReason> {
        // Thumbnails and icons served from the engine's own hosts are never
        // the original image.
        if self.engine.is_asset_host(url) {
            return Err(SkipReason::AssetHost);
        }

        let body = self
            .fetcher
            .fetch_bytes(url, self.config.download_timeout())
            .await?;

        if !body.content_type.starts_with("image/") {
            return Err(SkipReason::NotImage(body.content_type));
        }

        Ok(ImageResult {
            image_url: url.to_string(),
            base64_data: format!(
                "data:{};base64,{}",
                body.content_type,
                BASE64.encode(&body.bytes)
            ),
        })
    }

    /// Search the web for `query`, fetch up to `num_results` organic result
    /// pages and reduce each to a text digest.
    pub async fn scrape_sites(&self, query: &str, num_results: usize) -> Vec<PageResult> {
        let search_url = self.engine.web_search_url(query, num_results);
        let html = match self
            .fetcher
            .fetch_text(&search_url, self.config.search_timeout())
            .await
        {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("web search request failed: {}", e);
                return Vec::new();
            }
        };

        let links = self.engine.extract_result_links(&html);
        tracing::debug!("found {} result links for '{}'", links.len(), query);

        let mut results = Vec::new();
        for link in links {
            if results.len() >= num_results {
                break;
            }
            self.throttle.wait(self.config.page_delay_ms).await;
            match self
                .fetcher
                .fetch_text(&link, self.config.download_timeout())
                .await
            {
                Ok(page_html) => results.push(extract::extract_page(&page_html, &link)),
                Err(e) => {
                    tracing::debug!("skipping result page {}: {}", link, e);
                }
            }
        }
        results
    }
}
