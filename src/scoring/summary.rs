//! Extractive summaries
//!
//! Sentences are ranked by the summed frequency of their words across the whole
//! text and taken greedily, best first, while they fit in the length limit.

use std::collections::HashMap;

/// Sentences this short (in characters) are never picked
const MIN_SENTENCE_CHARS: usize = 20;

/// Builds a summary of at most `max_chars` characters, plus the closing period
///
/// Returns an empty string when the text has no sentence longer than 20
/// characters. If not even the best sentence fits, the text itself is cut to
/// `max_chars` and ends with "...".
pub fn generate_summary(text: &str, max_chars: usize) -> String {
    let sentences: Vec<&str> = text
        .split(|c| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .collect();

    if sentences.is_empty() {
        return String::new();
    }

    let mut frequency: HashMap<String, usize> = HashMap::new();
    for word in words(text) {
        *frequency.entry(word).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = sentences
        .iter()
        .map(|sentence| {
            let weight = words(sentence)
                .map(|word| frequency.get(&word).copied().unwrap_or(0))
                .sum();
            (*sentence, weight)
        })
        .collect();
    // Stable, so equal weights keep document order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut picked = Vec::new();
    let mut length = 0;
    for (sentence, _) in ranked {
        let chars = sentence.chars().count();
        if length + chars > max_chars {
            break;
        }
        picked.push(sentence);
        length += chars;
    }

    if picked.is_empty() {
        let text = text.trim();
        if text.chars().count() > max_chars {
            let cut: String = text.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            text.to_string()
        }
    } else {
        format!("{}.", picked.join(" "))
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}
