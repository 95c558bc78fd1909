//! Content quality scoring
//!
//! Turns a [`PageRecord`] into a [`ScoredPage`] with deterministic heuristics:
//! - a numeric quality score in [0, 100] ([`quality`])
//! - content type, language, sentiment and keywords ([`classify`])
//! - a short extractive summary ([`summary`])
//!
//! All tables live in [`rules`] and are carried by [`ScoringRules`], so the same
//! page scored with the same rules always yields the same result.

pub mod classify;
pub mod quality;
pub mod rules;
pub mod summary;

pub use rules::{ContentRule, LanguageProfile};
pub use summary::generate_summary;

use crate::report::{PageRecord, ScoredPage};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Rule tables and tunables used by the scorer
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRules {
    /// Content type rules in priority order
    pub content_rules: Vec<ContentRule>,
    pub positive_indicators: Vec<String>,
    pub negative_indicators: Vec<String>,
    pub languages: Vec<LanguageProfile>,
    pub positive_words: HashSet<String>,
    pub negative_words: HashSet<String>,
    pub stop_words: HashSet<String>,

    /// Word count at which the length component stops growing
    pub length_plateau: usize,

    pub max_keywords: usize,

    /// Character budget for the page summary
    pub summary_length: usize,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            content_rules: rules::content_rules(),
            positive_indicators: rules::positive_indicators(),
            negative_indicators: rules::negative_indicators(),
            languages: rules::language_profiles(),
            positive_words: rules::positive_words(),
            negative_words: rules::negative_words(),
            stop_words: rules::stop_words(),
            length_plateau: 800,
            max_keywords: 10,
            summary_length: 200,
        }
    }
}

fn default_rules() -> &'static ScoringRules {
    static RULES: OnceLock<ScoringRules> = OnceLock::new();
    RULES.get_or_init(ScoringRules::default)
}

/// Scores a page with the built-in rules
///
/// # Example
///
/// ```
/// use pagesift::report::PageRecord;
/// use pagesift::scoring::score;
///
/// let page = PageRecord {
///     url: "https://example.com/".to_string(),
///     raw_text: "The quick brown fox jumps over the lazy dog.".to_string(),
///     word_count: 9,
///     ..PageRecord::default()
/// };
/// let scored = score(page);
/// assert!(scored.quality_score > 0.0);
/// assert_eq!(scored.language, "en");
/// ```
pub fn score(page: PageRecord) -> ScoredPage {
    score_with(page, default_rules())
}

/// Scores a page with caller-supplied rules
pub fn score_with(page: PageRecord, rules: &ScoringRules) -> ScoredPage {
    let tokens = tokenize(&page.raw_text);

    ScoredPage {
        quality_score: quality::quality_score(&page, &tokens, rules),
        content_type: classify::content_type(&page, &tokens, rules),
        language: classify::language(&tokens, &page.raw_text, rules),
        sentiment: classify::sentiment(&tokens, rules),
        keywords: classify::keywords(&tokens, rules),
        summary: generate_summary(&page.raw_text, rules.summary_length),
        error: None,
        page,
    }
}

/// Lowercased words with surrounding punctuation removed
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}
