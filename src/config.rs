//! Service configuration with defaults tuned for polite scraping.

use std::time::Duration;

/// Raised when a [`ServiceConfig`] fails validation.
#[derive(Debug, thiserror::Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(pub String);

/// Tunable knobs for the search and scrape pipelines.
///
/// Use [`Default::default()`] for the stock behaviour, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// User-Agent presented to the search engine and to downloaded sites.
    pub user_agent: String,
    /// Accept header sent with every request.
    pub accept: String,
    /// Accept-Language header sent with every request.
    pub accept_language: String,
    /// Timeout in seconds for fetching a search results page.
    pub search_timeout_secs: u64,
    /// Timeout in seconds for downloading an individual image or result page.
    pub download_timeout_secs: u64,
    /// Random delay range in milliseconds `(min, max)` inserted after each
    /// successful image download.
    pub image_delay_ms: (u64, u64),
    /// Random delay range in milliseconds `(min, max)` inserted before each
    /// result page fetch.
    pub page_delay_ms: (u64, u64),
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
            search_timeout_secs: 30,
            download_timeout_secs: 10,
            image_delay_ms: (500, 1000),
            page_delay_ms: (1000, 2000),
        }
    }
}

impl ServiceConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError("user_agent must not be empty".into()));
        }
        if self.search_timeout_secs == 0 {
            return Err(ConfigError("search_timeout_secs must be greater than 0".into()));
        }
        if self.download_timeout_secs == 0 {
            return Err(ConfigError("download_timeout_secs must be greater than 0".into()));
        }
        if self.image_delay_ms.0 > self.image_delay_ms.1 {
            return Err(ConfigError("image_delay_ms min must be <= max".into()));
        }
        if self.page_delay_ms.0 > self.page_delay_ms.1 {
            return Err(ConfigError("page_delay_ms min must be <= max".into()));
        }
        Ok(())
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}
