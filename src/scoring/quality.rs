//! Numeric quality score
//!
//! The score is the sum of independent components, each bounded, minus penalties,
//! then clamped to [0, 100] and rounded to two decimals.

use crate::report::PageRecord;
use crate::scoring::ScoringRules;

const LENGTH_POINTS: f64 = 30.0;
const STRUCTURE_POINTS: f64 = 20.0;
const DIVERSITY_POINTS: f64 = 15.0;
const INDICATOR_POINTS: f64 = 15.0;
const BOILERPLATE_PENALTY: f64 = 25.0;
const REPETITION_PENALTY: f64 = 10.0;

/// Tokens per window when measuring vocabulary diversity
const DIVERSITY_WINDOW: usize = 200;

/// Scores a page in [0, 100]; an empty page scores 0
pub fn quality_score(page: &PageRecord, tokens: &[String], rules: &ScoringRules) -> f64 {
    if page.word_count == 0 || tokens.is_empty() {
        return 0.0;
    }

    let unique = windowed_unique_ratio(tokens, DIVERSITY_WINDOW);
    let lowered = page.raw_text.to_lowercase();

    let raw = length_points(page.word_count, rules.length_plateau)
        + structure_points(page)
        + readability_points(&page.raw_text)
        + unique * DIVERSITY_POINTS
        + indicator_points(&lowered, rules)
        - penalties(page, tokens.len(), unique);

    round2(raw.clamp(0.0, 100.0))
}

/// Linear in word count up to `plateau` words, flat afterwards
pub fn length_points(word_count: usize, plateau: usize) -> f64 {
    if plateau == 0 {
        return LENGTH_POINTS;
    }
    LENGTH_POINTS * (word_count.min(plateau) as f64 / plateau as f64)
}

pub fn structure_points(page: &PageRecord) -> f64 {
    let raw = page.headings as f64 * 2.0 + page.paragraphs as f64 * 0.5 + page.lists as f64;
    raw.min(STRUCTURE_POINTS)
}

/// Points by average sentence length in words
pub fn readability_points(text: &str) -> f64 {
    let sentences: Vec<&str> = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .collect();

    if sentences.is_empty() {
        return 0.0;
    }

    let words: usize = sentences.iter().map(|s| s.split_whitespace().count()).sum();
    let average = words as f64 / sentences.len() as f64;

    if (10.0..=20.0).contains(&average) {
        20.0
    } else if (5.0..=25.0).contains(&average) {
        15.0
    } else if (3.0..=30.0).contains(&average) {
        10.0
    } else {
        5.0
    }
}

/// Share of distinct tokens
pub fn unique_ratio(tokens: &[String]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let distinct: std::collections::HashSet<&str> = tokens.iter().map(String::as_str).collect();
    distinct.len() as f64 / tokens.len() as f64
}

/// Share of distinct tokens within consecutive fixed-size windows
///
/// Unlike [`unique_ratio`] this does not shrink as a page grows: a long page
/// with a varied vocabulary keeps the ratio of a short one, while text that
/// repeats itself inside a window still scores low.
pub fn windowed_unique_ratio(tokens: &[String], window: usize) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let window = window.max(1);
    let distinct: usize = tokens
        .chunks(window)
        .map(|chunk| {
            chunk
                .iter()
                .map(String::as_str)
                .collect::<std::collections::HashSet<&str>>()
                .len()
        })
        .sum();
    distinct as f64 / tokens.len() as f64
}

fn indicator_points(lowered: &str, rules: &ScoringRules) -> f64 {
    let hits = |markers: &[String]| markers.iter().filter(|m| lowered.contains(m.as_str())).count();
    let balance = hits(&rules.positive_indicators) as f64 - hits(&rules.negative_indicators) as f64;
    (balance * 2.0).clamp(0.0, INDICATOR_POINTS)
}

fn penalties(page: &PageRecord, token_count: usize, unique: f64) -> f64 {
    let mut penalty = 0.0;

    let boilerplate = page.boilerplate_ratio();
    if boilerplate > 0.5 {
        penalty += (boilerplate - 0.5) / 0.5 * BOILERPLATE_PENALTY;
    }

    if token_count >= 50 && unique < 0.2 {
        penalty += REPETITION_PENALTY;
    }

    penalty
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::tokenize;

    fn page(text: &str) -> PageRecord {
        PageRecord {
            raw_text: text.to_string(),
            word_count: text.split_whitespace().count(),
            ..PageRecord::default()
        }
    }

    #[test]
    fn test_length_points_plateau() {
        assert_eq!(length_points(0, 800), 0.0);
        assert_eq!(length_points(400, 800), 15.0);
        assert_eq!(length_points(800, 800), 30.0);
        assert_eq!(length_points(5000, 800), 30.0);
        assert!(length_points(100, 800) < length_points(101, 800));
    }

    #[test]
    fn test_structure_points_capped() {
        let record = PageRecord {
            headings: 3,
            paragraphs: 4,
            lists: 1,
            ..PageRecord::default()
        };
        assert_eq!(structure_points(&record), 9.0);

        let record = PageRecord {
            headings: 50,
            ..PageRecord::default()
        };
        assert_eq!(structure_points(&record), 20.0);
    }

    #[test]
    fn test_readability_bands() {
        let twelve = "one two three four five six seven eight nine ten eleven twelve.";
        assert_eq!(readability_points(twelve), 20.0);
        assert_eq!(readability_points("one two three four five six."), 15.0);
        assert_eq!(readability_points("one two three. four five six."), 10.0);
        assert_eq!(readability_points("Hi. Yo. Ok."), 5.0);
        assert_eq!(readability_points(""), 0.0);
        assert_eq!(readability_points("..."), 0.0);
    }

    #[test]
    fn test_unique_ratio() {
        let tokens = tokenize("alpha beta alpha beta");
        assert_eq!(unique_ratio(&tokens), 0.5);
        assert_eq!(unique_ratio(&[]), 0.0);
    }

    #[test]
    fn test_windowed_unique_ratio() {
        let distinct: Vec<String> = (0..600).map(|i| format!("w{}", i)).collect();
        assert_eq!(windowed_unique_ratio(&distinct, 200), 1.0);

        // The same vocabulary twice over stays fully diverse per window
        let doubled: Vec<String> = distinct.iter().chain(&distinct).cloned().collect();
        assert_eq!(windowed_unique_ratio(&doubled, 200), 1.0);
        assert_eq!(unique_ratio(&doubled), 0.5);

        let spam = tokenize(&"spam eggs ".repeat(300));
        assert_eq!(windowed_unique_ratio(&spam, 200), 6.0 / 600.0);
        assert_eq!(windowed_unique_ratio(&[], 200), 0.0);
    }

    #[test]
    fn test_empty_page_scores_zero() {
        let rules = ScoringRules::default();
        assert_eq!(quality_score(&PageRecord::default(), &[], &rules), 0.0);
    }

    #[test]
    fn test_score_in_range_and_rounded() {
        let rules = ScoringRules::default();
        let record = page("A detailed and useful guide. It explains each step with care and shows examples.");
        let tokens = tokenize(&record.raw_text);
        let score = quality_score(&record, &tokens, &rules);

        assert!((0.0..=100.0).contains(&score));
        assert_eq!(score, (score * 100.0).round() / 100.0);
    }

    #[test]
    fn test_boilerplate_penalty() {
        let rules = ScoringRules::default();
        let mut record = page("Useful words about gardening tools and soil preparation for spring.");
        let tokens = tokenize(&record.raw_text);
        let clean = quality_score(&record, &tokens, &rules);

        record.boilerplate_words = record.word_count;
        let chrome = quality_score(&record, &tokens, &rules);

        assert!((clean - chrome - 25.0).abs() < 0.02);
    }

    #[test]
    fn test_repetition_penalty() {
        let rules = ScoringRules::default();
        let record = page(&"spam ".repeat(60));
        let tokens = tokenize(&record.raw_text);
        let score = quality_score(&record, &tokens, &rules);

        let without_penalty = length_points(60, rules.length_plateau)
            + readability_points(&record.raw_text)
            + windowed_unique_ratio(&tokens, DIVERSITY_WINDOW) * 15.0;
        assert!(score < without_penalty);
    }

    #[test]
    fn test_negative_indicators_never_go_below_zero() {
        let rules = ScoringRules::default();
        assert_eq!(indicator_points("brief vague generic spam", &rules), 0.0);
        assert_eq!(indicator_points("detailed and thorough", &rules), 4.0);
        assert_eq!(
            indicator_points(
                "comprehensive detailed thorough complete extensive informative educational helpful useful",
                &rules
            ),
            15.0
        );
    }
}
