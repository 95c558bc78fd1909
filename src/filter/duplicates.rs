//! Near-duplicate detection by word-set overlap

use crate::report::ScoredPage;
use std::collections::HashSet;

fn word_set(text: &str) -> HashSet<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Jaccard similarity of the lowercased word sets of two texts
///
/// Two texts without any words have similarity 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    jaccard(&word_set(a), &word_set(b))
}

/// Keeps each page unless it is at least `threshold` similar to a page kept before it
///
/// Pages without text never count as duplicates. The kept pages are pairwise
/// below the threshold, so running this again over its own output keeps them all.
pub(super) fn first_of_each<'a>(
    pages: impl Iterator<Item = &'a ScoredPage>,
    threshold: f64,
) -> Vec<ScoredPage> {
    let mut kept: Vec<ScoredPage> = Vec::new();
    let mut kept_sets: Vec<HashSet<String>> = Vec::new();

    for page in pages {
        let words = word_set(&page.page.raw_text);
        if let Some(original) = kept_sets
            .iter()
            .position(|seen| jaccard(&words, seen) >= threshold)
        {
            tracing::debug!(
                "Dropping {} as a near duplicate of {}",
                page.url(),
                kept[original].url()
            );
            continue;
        }
        kept_sets.push(words);
        kept.push(page.clone());
    }

    kept
}
