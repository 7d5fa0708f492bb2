//! Google search results parsing.
//!
//! Image candidates come from a regex sweep over the raw results page, since
//! the interesting URLs mostly live inside inline script blobs rather than the
//! DOM. Organic web results are read from the `div.g` result blocks.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::engine::SearchEngine;

// ── Constants ────────────────────────────────────────────────────────────────

const SEARCH_BASE: &str = "https://www.google.com/search";
const ASSET_HOST_NEEDLES: &[&str] = &["gstatic.com", "google.com"];
const SELF_HOST_NEEDLE: &str = "google.";

static IMAGE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)https?://[^"']*?(?:jpg|jpeg|png|gif)"#).unwrap());

// ── Engine implementation ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct GoogleSearch;

impl SearchEngine for GoogleSearch {
    fn image_search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&tbm=isch&safe=active",
            SEARCH_BASE,
            urlencoding::encode(query)
        )
    }

    fn web_search_url(&self, query: &str, num_results: usize) -> String {
        format!(
            "{}?q={}&num={}",
            SEARCH_BASE,
            urlencoding::encode(query),
            num_results
        )
    }

    fn extract_image_candidates(&self, html: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        IMAGE_URL_RE
            .find_iter(html)
            .map(|m| m.as_str().to_string())
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }

    fn extract_result_links(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let block_sel = Selector::parse("div.g").unwrap();
        let anchor_sel = Selector::parse("a").unwrap();

        let mut links = Vec::new();
        for block in document.select(&block_sel) {
            let anchor = match block.select(&anchor_sel).next() {
                Some(a) => a,
                None => continue,
            };
            let href = anchor.value().attr("href").unwrap_or("");
            if !href.starts_with("http") {
                continue;
            }
            if host_contains(href, SELF_HOST_NEEDLE) {
                continue;
            }
            links.push(href.to_string());
        }
        links
    }

    fn is_asset_host(&self, url: &str) -> bool {
        ASSET_HOST_NEEDLES
            .iter()
            .any(|needle| host_contains(url, needle))
    }
}

/// True if `url` parses and its host contains `needle`. Unparseable URLs
/// never match.
fn host_contains(url: &str, needle: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.contains(needle)))
        .unwrap_or(false)
}
