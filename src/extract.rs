use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::PageResult;

// ── Constants ────────────────────────────────────────────────────────────────

const MAX_CONTENT_CHARS: usize = 1000;

/// Elements whose entire subtree is dropped before reading page text.
const SKIP_TAGS: &[&str] = &["script", "style", "nav", "footer", "iframe"];

/// Elements that end a run of inline text. A newline is emitted after each so
/// words in adjacent blocks do not fuse once whitespace is collapsed.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "table", "tr", "td",
    "th", "section", "article", "header", "main", "aside", "blockquote", "pre", "form", "figure",
    "figcaption",
];

/// Meta tags probed for the page description, in preference order.
const DESCRIPTION_META: &[(&str, &str)] =
    &[("name", "description"), ("property", "og:description")];

// ── Lazy static regexes ──────────────────────────────────────────────────────

static DISALLOWED_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s.,!?-]").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// ── Public API ───────────────────────────────────────────────────────────────

/// Reduce a fetched result page to its title, meta description and leading
/// visible text. Never fails; missing pieces come back as empty strings.
pub fn extract_page(html: &str, url: &str) -> PageResult {
    let document = Html::parse_document(html);

    let title = clean_text(&extract_title(&document));
    let meta_description = clean_text(&extract_meta_description(&document));
    let content = clean_text(&extract_visible_text(&document));

    PageResult {
        title,
        meta_description,
        content: truncate_chars(&content, MAX_CONTENT_CHARS).to_string(),
        url: url.to_string(),
    }
}

/// Normalize scraped text: drop characters outside letters, digits, whitespace
/// and basic punctuation, collapse whitespace runs to single spaces, and trim.
pub fn clean_text(text: &str) -> String {
    let stripped = DISALLOWED_CHAR_RE.replace_all(text, "");
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

// ── Title and meta description ───────────────────────────────────────────────

fn extract_title(document: &Html) -> String {
    let title_sel = Selector::parse("title").unwrap();
    document
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
}

fn extract_meta_description(document: &Html) -> String {
    for (attr, value) in DESCRIPTION_META {
        let sel_str = format!("meta[{}=\"{}\"]", attr, value);
        // Use .ok() immediately to drop SelectorErrorKind<'_> before sel_str is dropped.
        let sel = Selector::parse(&sel_str).ok();
        if let Some(sel) = sel {
            if let Some(el) = document.select(&sel).next() {
                return el.value().attr("content").unwrap_or("").to_string();
            }
        }
    }
    String::new()
}

// ── Visible text walker ──────────────────────────────────────────────────────

fn extract_visible_text(document: &Html) -> String {
    let body_sel = Selector::parse("body").unwrap();
    match document.select(&body_sel).next() {
        Some(body) => visible_text(body),
        None => String::new(),
    }
}

fn visible_text(el: ElementRef<'_>) -> String {
    use scraper::node::Node;

    let name = el.value().name();
    if SKIP_TAGS.contains(&name) {
        return String::new();
    }

    let mut result = String::new();
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                result.push_str(&*text.text);
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    result.push_str(&visible_text(child_el));
                }
            }
            _ => {}
        }
    }

    if BLOCK_TAGS.contains(&name) {
        result.push('\n');
    }
    result
}

// ── Truncation ───────────────────────────────────────────────────────────────

/// First `max` characters of `text`, cut on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_HTML: &str = r#"<html>
<head>
  <title>Ferris &amp; Friends - Crab Facts</title>
  <meta name="description" content="Everything about crabs.">
  <meta property="og:description" content="Social crab summary.">
  <style>body { color: red; }</style>
</head>
<body>
  <nav><a href="/home">Home</a> | <a href="/about">About</a></nav>
  <h1>Crab Facts</h1>
  <p>Crabs are <strong>decapod</strong> crustaceans.</p>
  <script>var tracker = "hidden-script-text";</script>
  <div>They walk sideways, mostly!</div>
  <iframe src="https://ads.example.com">embedded frame text</iframe>
  <footer>Copyright 2024 Crab Society</footer>
</body>
</html>"#;

    #[test]
    fn clean_text_collapses_whitespace_runs() {
        assert_eq!(clean_text("hello   world\n\n  again\t!"), "hello world again !");
    }

    #[test]
    fn clean_text_strips_disallowed_characters() {
        assert_eq!(clean_text("caf\u{e9} \u{a9}2024 (secret) [note]"), "caf\u{e9} 2024 secret note");
    }

    #[test]
    fn clean_text_keeps_allowed_punctuation() {
        assert_eq!(clean_text("Wait - really, now?! Yes."), "Wait - really, now?! Yes.");
    }

    #[test]
    fn clean_text_drops_underscores() {
        assert_eq!(clean_text("snake_case_name"), "snakecasename");
    }

    #[test]
    fn clean_text_never_leaves_double_spaces() {
        // Removing a disallowed character between two spaces must not leave
        // both spaces behind.
        let cleaned = clean_text("left \u{a9} right");
        assert_eq!(cleaned, "left right");
        assert!(!cleaned.contains("  "));
    }

    #[test]
    fn extract_page_reads_title_and_description() {
        let page = extract_page(PAGE_HTML, "https://crabs.example.com/facts");
        assert_eq!(page.title, "Ferris Friends - Crab Facts");
        assert_eq!(page.meta_description, "Everything about crabs.");
        assert_eq!(page.url, "https://crabs.example.com/facts");
    }

    #[test]
    fn extract_page_collects_only_visible_body_text() {
        let page = extract_page(PAGE_HTML, "https://crabs.example.com/facts");
        assert!(page.content.contains("Crabs are decapod crustaceans."));
        assert!(page.content.contains("They walk sideways, mostly!"));
        assert!(!page.content.contains("hidden-script-text"));
        assert!(!page.content.contains("Home"));
        assert!(!page.content.contains("Copyright"));
        assert!(!page.content.contains("embedded frame text"));
        assert!(!page.content.contains("color"));
        // Head content stays out of the body text.
        assert!(!page.content.contains("Ferris"));
    }

    #[test]
    fn extract_page_falls_back_to_og_description() {
        let html = r#"<html><head>
            <meta property="og:description" content="Only social description.">
        </head><body></body></html>"#;
        let page = extract_page(html, "https://a.example.com/");
        assert_eq!(page.meta_description, "Only social description.");
    }

    #[test]
    fn extract_page_prefers_named_description_even_when_empty() {
        let html = r#"<html><head>
            <meta name="description">
            <meta property="og:description" content="Ignored.">
        </head><body></body></html>"#;
        let page = extract_page(html, "https://a.example.com/");
        assert_eq!(page.meta_description, "");
    }

    #[test]
    fn extract_page_handles_bare_document() {
        let page = extract_page("<html></html>", "https://empty.example.com/");
        assert_eq!(page.title, "");
        assert_eq!(page.meta_description, "");
        assert_eq!(page.content, "");
        assert_eq!(page.url, "https://empty.example.com/");
    }

    #[test]
    fn extract_page_truncates_long_content() {
        let body: String = "word ".repeat(400);
        let html = format!("<html><body><p>{}</p></body></html>", body);
        let page = extract_page(&html, "https://long.example.com/");
        assert_eq!(page.content.chars().count(), MAX_CONTENT_CHARS);
        assert!(page.content.starts_with("word word"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "\u{e9}".repeat(1200);
        let cut = truncate_chars(&text, MAX_CONTENT_CHARS);
        assert_eq!(cut.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn block_elements_keep_words_separated() {
        let html = "<html><body><p>first</p><p>second</p></body></html>";
        let page = extract_page(html, "https://a.example.com/");
        assert_eq!(page.content, "first second");
    }

    #[test]
    fn inline_elements_do_not_split_words() {
        let html = "<html><body><p>re<em>join</em>ed</p></body></html>";
        let page = extract_page(html, "https://a.example.com/");
        assert_eq!(page.content, "rejoined");
    }
}
