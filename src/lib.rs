//! Search-and-scrape HTTP service.
//!
//! Exposes two endpoints: `/search_images` turns an image search into base64
//! data URLs, and `/scrape_sites` turns a web search into per-page text
//! digests. Everything upstream-facing sits behind small traits so the
//! pipelines can be exercised without touching the network.

pub mod api;
pub mod config;
pub mod engine;
pub mod extract;
pub mod fetch;
pub mod google;
pub mod models;
pub mod service;
pub mod throttle;

pub use config::ServiceConfig;
pub use service::SearchService;
