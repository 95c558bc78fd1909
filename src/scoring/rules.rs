//! Built-in rule tables
//!
//! Every heuristic the scorer applies is data in this file. The tables are turned
//! into owned [`ScoringRules`](super::ScoringRules) so callers can extend or replace
//! them without touching the scoring code.

use crate::report::ContentType;
use std::collections::HashSet;

/// Signals that vote for one content type
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRule {
    pub content_type: ContentType,

    /// Substrings of the lowercased URL, worth 3 points each
    pub url_patterns: Vec<String>,

    /// Words looked up in the title (2 points) and the body text (1 point)
    pub keywords: Vec<String>,

    /// Substrings of any meta value, worth 2 points each
    pub meta_patterns: Vec<String>,
}

/// Stop words that identify one language
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageProfile {
    /// ISO-639-1 code
    pub code: String,
    pub stop_words: HashSet<String>,
}

/// (content type, url patterns, keywords, meta patterns); earlier rows win ties
const CONTENT_TABLE: &[(
    ContentType,
    &[&str],
    &[&str],
    &[&str],
)] = &[
    (
        ContentType::Article,
        &["/article/", "/post/", "/blog/", "/news/"],
        &["article", "post", "blog", "news", "story", "feature"],
        &["article", "post", "blog"],
    ),
    (
        ContentType::Product,
        &["/product/", "/item/", "/shop/", "/store/"],
        &["product", "item", "buy", "purchase", "price", "shop"],
        &["product", "item", "ecommerce"],
    ),
    (
        ContentType::Review,
        &["/review/", "/rating/", "/feedback/"],
        &["review", "rating", "feedback", "opinion", "test"],
        &["review", "rating"],
    ),
    (
        ContentType::News,
        &["/news/", "/breaking/", "/latest/"],
        &["news", "breaking", "latest", "update", "announcement"],
        &["news", "breaking"],
    ),
    (
        ContentType::Blog,
        &["/blog/", "/posts/", "/journal/"],
        &["blog", "post", "journal", "diary", "thoughts"],
        &["blog", "post"],
    ),
];

const POSITIVE_INDICATORS: &[&str] = &[
    "comprehensive",
    "detailed",
    "thorough",
    "complete",
    "extensive",
    "well-written",
    "informative",
    "educational",
    "helpful",
    "useful",
    "professional",
    "expert",
    "authoritative",
    "reliable",
    "accurate",
];

const NEGATIVE_INDICATORS: &[&str] = &[
    "incomplete",
    "brief",
    "short",
    "minimal",
    "basic",
    "poorly written",
    "confusing",
    "unclear",
    "vague",
    "generic",
    "spam",
    "clickbait",
    "misleading",
    "outdated",
    "irrelevant",
];

const LANGUAGE_TABLE: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
            "are", "was", "this", "that", "it",
        ],
    ),
    (
        "es",
        &[
            "el", "la", "los", "las", "de", "que", "y", "en", "un", "una", "es", "se", "por",
            "con", "para", "del",
        ],
    ),
    (
        "fr",
        &[
            "le", "la", "les", "de", "des", "et", "à", "en", "un", "une", "est", "que", "du",
            "pour", "dans", "avec",
        ],
    ),
    (
        "de",
        &[
            "der", "die", "das", "und", "ist", "nicht", "ein", "eine", "zu", "mit", "den", "von",
            "sich", "auf", "für", "dem",
        ],
    ),
];

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "awesome",
    "perfect",
    "love",
    "like",
    "enjoy",
    "happy",
    "pleased",
    "satisfied",
    "best",
    "top",
    "outstanding",
    "brilliant",
    "superb",
    "magnificent",
    "terrific",
    "fabulous",
    "incredible",
    "remarkable",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "horrible",
    "worst",
    "disappointing",
    "poor",
    "unfortunate",
    "hate",
    "dislike",
    "angry",
    "sad",
    "upset",
    "frustrated",
    "annoyed",
    "disgusted",
    "dreadful",
    "atrocious",
    "abysmal",
    "appalling",
    "deplorable",
    "miserable",
];

/// Words never reported as keywords
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
    "these", "those", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us",
    "them", "my", "your", "his", "its", "our", "their", "mine", "yours", "hers", "ours",
    "theirs", "from", "about", "into", "than", "then", "there", "what", "when", "where",
    "which", "while", "with", "also", "more", "most", "some", "such", "only", "very",
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn owned_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

pub(crate) fn content_rules() -> Vec<ContentRule> {
    CONTENT_TABLE
        .iter()
        .map(|(content_type, urls, keywords, meta)| ContentRule {
            content_type: *content_type,
            url_patterns: owned(urls),
            keywords: owned(keywords),
            meta_patterns: owned(meta),
        })
        .collect()
}

pub(crate) fn positive_indicators() -> Vec<String> {
    owned(POSITIVE_INDICATORS)
}

pub(crate) fn negative_indicators() -> Vec<String> {
    owned(NEGATIVE_INDICATORS)
}

pub(crate) fn language_profiles() -> Vec<LanguageProfile> {
    LANGUAGE_TABLE
        .iter()
        .map(|(code, words)| LanguageProfile {
            code: code.to_string(),
            stop_words: owned_set(words),
        })
        .collect()
}

pub(crate) fn positive_words() -> HashSet<String> {
    owned_set(POSITIVE_WORDS)
}

pub(crate) fn negative_words() -> HashSet<String> {
    owned_set(NEGATIVE_WORDS)
}

pub(crate) fn stop_words() -> HashSet<String> {
    owned_set(STOP_WORDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_rules_cover_every_known_type() {
        let rules = content_rules();
        for content_type in ContentType::all() {
            let covered = rules.iter().any(|r| r.content_type == content_type);
            assert_eq!(covered, content_type != ContentType::Unknown);
        }
    }

    #[test]
    fn test_tables_are_lowercase() {
        for rule in content_rules() {
            for word in rule.url_patterns.iter().chain(&rule.keywords).chain(&rule.meta_patterns) {
                assert_eq!(word, &word.to_lowercase());
            }
        }
        for profile in language_profiles() {
            assert_eq!(profile.code.len(), 2);
            assert!(profile.stop_words.iter().all(|w| w == &w.to_lowercase()));
        }
    }

    #[test]
    fn test_lexicons_disjoint() {
        let positive = positive_words();
        assert!(negative_words().iter().all(|w| !positive.contains(w)));
    }
}
