//! Categorical tags: content type, language, sentiment and keywords

use crate::report::{ContentType, PageRecord, Sentiment, UNKNOWN_LANGUAGE};
use crate::scoring::{tokenize, ScoringRules};
use std::collections::{HashMap, HashSet};

/// Sentiment ratio beyond which a page leans one way
const SENTIMENT_THRESHOLD: f64 = 0.05;

/// Minimum stop-word hits before a language is reported
const MIN_LANGUAGE_HITS: usize = 2;

/// Votes for a content type from URL, title, body and meta signals
///
/// Keywords count as whole words of the title or body tokens. Highest total
/// wins, ties go to the earlier rule, and no signal at all means
/// [`ContentType::Unknown`].
pub fn content_type(page: &PageRecord, tokens: &[String], rules: &ScoringRules) -> ContentType {
    let url = page.url.to_lowercase();
    let title_tokens = tokenize(&page.title);
    let title: HashSet<&str> = title_tokens.iter().map(String::as_str).collect();
    let body: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    let meta: Vec<String> = page.meta.values().map(|v| v.to_lowercase()).collect();

    let mut best = ContentType::Unknown;
    let mut best_score = 0;

    for rule in &rules.content_rules {
        let mut score = 0;

        score += 3 * rule
            .url_patterns
            .iter()
            .filter(|p| url.contains(p.as_str()))
            .count();

        for keyword in &rule.keywords {
            if title.contains(keyword.as_str()) {
                score += 2;
            }
            if body.contains(keyword.as_str()) {
                score += 1;
            }
        }

        for pattern in &rule.meta_patterns {
            score += 2 * meta.iter().filter(|v| v.contains(pattern.as_str())).count();
        }

        if score > best_score {
            best = rule.content_type;
            best_score = score;
        }
    }

    best
}

/// Detects the page language from stop-word frequencies
///
/// Returns an ISO-639-1 code, or `"unknown"` when the text is mostly non-Latin,
/// too short to be confident, or ambiguous between two languages.
pub fn language(tokens: &[String], text: &str, rules: &ScoringRules) -> String {
    if tokens.is_empty() || !mostly_latin(text) {
        return UNKNOWN_LANGUAGE.to_string();
    }

    let mut counts: Vec<(&str, usize)> = rules
        .languages
        .iter()
        .map(|profile| {
            let hits = tokens
                .iter()
                .filter(|t| profile.stop_words.contains(t.as_str()))
                .count();
            (profile.code.as_str(), hits)
        })
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    match counts.as_slice() {
        [(code, hits), rest @ ..]
            if *hits >= MIN_LANGUAGE_HITS && rest.first().map_or(true, |(_, h)| h < hits) =>
        {
            code.to_string()
        }
        _ => UNKNOWN_LANGUAGE.to_string(),
    }
}

fn mostly_latin(text: &str) -> bool {
    let mut alphabetic = 0usize;
    let mut latin = 0usize;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        alphabetic += 1;
        if c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c) {
            latin += 1;
        }
    }
    alphabetic > 0 && latin * 2 > alphabetic
}

/// Lexicon balance normalized by token count
pub fn sentiment(tokens: &[String], rules: &ScoringRules) -> Sentiment {
    if tokens.is_empty() {
        return Sentiment::Neutral;
    }

    let positive = tokens
        .iter()
        .filter(|t| rules.positive_words.contains(t.as_str()))
        .count() as f64;
    let negative = tokens
        .iter()
        .filter(|t| rules.negative_words.contains(t.as_str()))
        .count() as f64;

    let ratio = (positive - negative) / tokens.len() as f64;
    if ratio > SENTIMENT_THRESHOLD {
        Sentiment::Positive
    } else if ratio < -SENTIMENT_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Most repeated meaningful words, by frequency then alphabetically
pub fn keywords(tokens: &[String], rules: &ScoringRules) -> Vec<String> {
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        if token.chars().count() > 3
            && !rules.stop_words.contains(token.as_str())
            && !token.chars().all(|c| c.is_ascii_digit())
        {
            *frequency.entry(token.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = frequency.into_iter().filter(|(_, n)| *n > 1).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(rules.max_keywords)
        .map(|(word, _)| word.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, title: &str, text: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            title: title.to_string(),
            raw_text: text.to_string(),
            word_count: text.split_whitespace().count(),
            ..PageRecord::default()
        }
    }

    #[test]
    fn test_content_type_from_url() {
        let rules = ScoringRules::default();
        let record = page("https://shop.example.com/product/42", "", "");
        assert_eq!(content_type(&record, &tokenize(&record.raw_text), &rules), ContentType::Product);
    }

    #[test]
    fn test_content_type_from_title_and_body() {
        let rules = ScoringRules::default();
        let record = page(
            "https://example.com/x",
            "Camera review",
            "Our rating after a week of use",
        );
        assert_eq!(content_type(&record, &tokenize(&record.raw_text), &rules), ContentType::Review);
    }

    #[test]
    fn test_content_type_from_meta() {
        let rules = ScoringRules::default();
        let mut record = page("https://example.com/x", "", "");
        record
            .meta
            .insert("og:type".to_string(), "breaking".to_string());
        assert_eq!(content_type(&record, &tokenize(&record.raw_text), &rules), ContentType::News);
    }

    #[test]
    fn test_content_type_tie_goes_to_earlier_rule() {
        let rules = ScoringRules::default();
        // "/blog/" is both an article and a blog URL pattern
        let record = page("https://example.com/blog/", "", "");
        assert_eq!(content_type(&record, &tokenize(&record.raw_text), &rules), ContentType::Article);
    }

    #[test]
    fn test_content_type_unknown_without_signals() {
        let rules = ScoringRules::default();
        let record = page("https://example.com/x", "Hello", "nothing matches here");
        assert_eq!(content_type(&record, &tokenize(&record.raw_text), &rules), ContentType::Unknown);
    }

    #[test]
    fn test_content_keywords_match_whole_words() {
        let rules = ScoringRules::default();
        // "latest" holds "test", "items" holds "item", "reports" holds "post"
        let record = page(
            "https://example.com/x",
            "The latest items",
            "Contestants reviewed the pricelist and the reports of itemized purchases",
        );
        assert_eq!(
            content_type(&record, &tokenize(&record.raw_text), &rules),
            ContentType::News
        );

        let record = page("https://example.com/x", "", "Pricing and itemized detestable lists");
        assert_eq!(
            content_type(&record, &tokenize(&record.raw_text), &rules),
            ContentType::Unknown
        );
    }

    #[test]
    fn test_language_detection() {
        let rules = ScoringRules::default();
        let detect = |text: &str| language(&tokenize(text), text, &rules);

        assert_eq!(detect("The cat sat on the mat and it was happy"), "en");
        assert_eq!(detect("Los perros del barrio corren por el parque con alegría"), "es");
        assert_eq!(detect("Le chat dort dans la maison avec les enfants"), "fr");
        assert_eq!(detect("Der Hund und die Katze sind nicht im Haus"), "de");
    }

    #[test]
    fn test_language_unknown_cases() {
        let rules = ScoringRules::default();
        let detect = |text: &str| language(&tokenize(text), text, &rules);

        assert_eq!(detect(""), "unknown");
        assert_eq!(detect("Hello"), "unknown");
        assert_eq!(detect("これは日本語の文章です とても長い文章です"), "unknown");
        assert_eq!(detect("la de"), "unknown");
    }

    #[test]
    fn test_sentiment() {
        let rules = ScoringRules::default();
        let classify = |text: &str| sentiment(&tokenize(text), &rules);

        assert_eq!(classify("What a great and excellent day"), Sentiment::Positive);
        assert_eq!(classify("A terrible, awful experience"), Sentiment::Negative);
        assert_eq!(classify("The meeting starts at noon"), Sentiment::Neutral);
        assert_eq!(classify(""), Sentiment::Neutral);
    }

    #[test]
    fn test_keywords_ranked() {
        let rules = ScoringRules::default();
        let tokens = tokenize(
            "Rust compiler rust compiler rust borrow borrow checker the the the this this 2024 2024",
        );
        assert_eq!(keywords(&tokens, &rules), vec!["rust", "borrow", "compiler"]);
    }

    #[test]
    fn test_keywords_capped() {
        let rules = ScoringRules::default();
        let text: String = (0..20)
            .map(|i| format!("word{i:02} word{i:02} "))
            .collect();
        assert_eq!(keywords(&tokenize(&text), &rules).len(), 10);
    }
}
