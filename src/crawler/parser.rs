//! HTML extractor
//!
//! Turns a fetched document into a [`PageRecord`]:
//! - Title, meta tags, description and publication date
//! - Visible text (script, style, noscript, template and `<head>` content removed)
//! - Links to follow and image sources, resolved to absolute URLs
//! - Structural counts the scorer relies on (headings, paragraphs, lists, and words
//!   sitting in navigation chrome)
//!
//! Extraction is total: empty or malformed markup yields an empty record.

use crate::crawler::dates::extract_published;
use crate::report::PageRecord;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that hold navigation chrome rather than content
const BOILERPLATE_ELEMENTS: &[&str] = &["nav", "header", "footer", "aside"];

/// Extracts a page record from raw HTML
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anywhere in the document, in document order
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that is not http(s) after resolution
///
/// Images come from `<img src="...">` under the same resolution rules.
///
/// # Arguments
///
/// * `raw_html` - The HTML content to parse
/// * `base_url` - The URL the document was served from, used to resolve links
///
/// # Example
///
/// ```
/// use pagesift::crawler::extract;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><p>Hello there</p><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let page = extract(html, &base_url);
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn extract(raw_html: &str, base_url: &Url) -> PageRecord {
    let document = Html::parse_document(raw_html);

    let text = collect_text(&document);
    let meta = extract_meta(&document);
    let description = meta
        .get("description")
        .or_else(|| meta.get("og:description"))
        .cloned();
    let published = extract_published(&meta, &text.visible);

    PageRecord {
        url: base_url.to_string(),
        final_url: base_url.to_string(),
        title: extract_title(&document).unwrap_or_default(),
        word_count: text.words,
        raw_text: text.visible,
        links: extract_links(&document, base_url),
        images: extract_images(&document, base_url),
        description,
        meta,
        headings: count_with_text(&document, "h1, h2, h3, h4, h5, h6"),
        paragraphs: count_with_text(&document, "p"),
        lists: count_lists(&document),
        boilerplate_words: text.boilerplate_words,
        published,
        ..PageRecord::default()
    }
}

struct TextSummary {
    visible: String,
    words: usize,
    boilerplate_words: usize,
}

/// Walks every text node once, keeping the visible ones
fn collect_text(document: &Html) -> TextSummary {
    let mut visible = String::new();
    let mut words = 0;
    let mut boilerplate_words = 0;

    for node in document.tree.root().descendants() {
        let text = match node.value() {
            Node::Text(text) => &**text,
            _ => continue,
        };

        let mut hidden = false;
        let mut boilerplate = false;
        for ancestor in node.ancestors() {
            if let Some(element) = ancestor.value().as_element() {
                let name = element.name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    hidden = true;
                    break;
                }
                if BOILERPLATE_ELEMENTS.contains(&name) {
                    boilerplate = true;
                }
            }
        }
        if hidden {
            continue;
        }

        for word in text.split_whitespace() {
            if !visible.is_empty() {
                visible.push(' ');
            }
            visible.push_str(word);
            words += 1;
            if boilerplate {
                boilerplate_words += 1;
            }
        }
    }

    TextSummary {
        visible,
        words,
        boilerplate_words,
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
}

/// Collects `<meta name|property="..." content="...">` pairs, keys lowercased
fn extract_meta(document: &Html) -> BTreeMap<String, String> {
    let mut meta = BTreeMap::new();

    if let Ok(selector) = Selector::parse("meta[content]") {
        for element in document.select(&selector) {
            let value = element.value();
            let key = value.attr("name").or_else(|| value.attr("property"));
            let content = value.attr("content").map(str::trim).unwrap_or_default();

            if let Some(key) = key {
                let key = key.trim().to_lowercase();
                if !key.is_empty() && !content.is_empty() {
                    meta.entry(key).or_insert_with(|| content.to_string());
                }
            }
        }
    }

    meta
}

/// Extracts all followable links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

fn extract_images(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("img[src]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .filter_map(|src| resolve_link(src, base_url))
        .collect()
}

fn count_with_text(document: &Html, selector: &str) -> usize {
    let Ok(selector) = Selector::parse(selector) else {
        return 0;
    };

    document
        .select(&selector)
        .filter(|element| element.text().any(|t| !t.trim().is_empty()))
        .count()
}

fn count_lists(document: &Html) -> usize {
    let (Ok(lists), Ok(items)) = (Selector::parse("ul, ol"), Selector::parse("li")) else {
        return 0;
    };

    document
        .select(&lists)
        .filter(|list| list.select(&items).next().is_some())
        .count()
}

fn collapse_whitespace(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url)
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" =>
        {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
