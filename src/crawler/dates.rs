//! Publication date detection
//!
//! Meta tags are checked first, in [`DATE_META_KEYS`] order. If none holds a
//! parseable date, the visible text is scanned for US-style (`3/9/2024`), ISO
//! (`2024-03-09`) and long-form (`March 9, 2024`) dates, in that order.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Meta keys that carry a publication date, most specific first
const DATE_META_KEYS: &[&str] = &[
    "article:published_time",
    "og:published_time",
    "date",
    "published",
    "pubdate",
    "dc.date",
    "created",
    "updated",
];

struct TextPattern {
    regex: Regex,
    format: &'static str,
}

fn text_patterns() -> &'static [TextPattern] {
    static PATTERNS: OnceLock<Vec<TextPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"\b\d{1,2}/\d{1,2}/\d{4}\b", "%m/%d/%Y"),
            (r"\b\d{4}-\d{2}-\d{2}\b", "%Y-%m-%d"),
            (
                r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b",
                "%B %d %Y",
            ),
        ]
        .into_iter()
        .filter_map(|(pattern, format)| match Regex::new(pattern) {
            Ok(regex) => Some(TextPattern { regex, format }),
            Err(e) => {
                tracing::error!("Invalid date pattern {}: {}", pattern, e);
                None
            }
        })
        .collect()
    })
}

/// Finds the publication date of a page
///
/// # Arguments
///
/// * `meta` - Lowercased meta keys and their content
/// * `text` - Visible page text
///
/// # Returns
///
/// The first date found, or `None` when neither source holds a valid one
pub fn extract_published(meta: &BTreeMap<String, String>, text: &str) -> Option<NaiveDate> {
    DATE_META_KEYS
        .iter()
        .filter_map(|key| meta.get(*key))
        .find_map(|value| parse_meta_date(value))
        .or_else(|| find_text_date(text))
}

/// Parses an RFC 3339 timestamp, a naive ISO timestamp or a bare ISO date
fn parse_meta_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(timestamp.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn find_text_date(text: &str) -> Option<NaiveDate> {
    text_patterns().iter().find_map(|pattern| {
        pattern.regex.find_iter(text).find_map(|found| {
            // "%B %d %Y" has no comma
            let candidate = found.as_str().replace(',', "");
            let candidate = candidate.split_whitespace().collect::<Vec<_>>().join(" ");
            NaiveDate::parse_from_str(&candidate, pattern.format).ok()
        })
    })
}
