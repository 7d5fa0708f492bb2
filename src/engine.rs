//! Search engine abstraction.
//!
//! A [`SearchEngine`] knows how to build result-page URLs for a query and how
//! to pull candidates back out of the returned HTML. The pipelines in
//! [`crate::service`] stay engine-agnostic; [`crate::google::GoogleSearch`] is
//! the production implementation.

/// URL construction and result extraction for one upstream search engine.
pub trait SearchEngine: Send + Sync {
    /// URL of the image search results page for `query`.
    fn image_search_url(&self, query: &str) -> String;

    /// URL of the web search results page for `query`, asking for
    /// `num_results` organic results.
    fn web_search_url(&self, query: &str, num_results: usize) -> String;

    /// Image URL candidates found in an image search results page, deduplicated
    /// with first-seen order preserved.
    fn extract_image_candidates(&self, html: &str) -> Vec<String>;

    /// Outbound links of the organic results in a web search results page, in
    /// page order. Relative links and links back into the engine itself are
    /// dropped.
    fn extract_result_links(&self, html: &str) -> Vec<String>;

    /// True if `url` points at the engine's own thumbnail or asset hosting
    /// rather than an original image.
    fn is_asset_host(&self, url: &str) -> bool;
}
