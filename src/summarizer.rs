//! Extractive summaries.
//!
//! Reviews are split into sentence fragments and every fragment is scored by
//! the global frequency of its content words across the whole review set.
//! The top three distinct fragments, in score order, become the summary body.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::highlights::uniq_keep_order;
use crate::stats::ReviewStats;

pub const MAX_EXCERPTS: usize = 3;

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+\s*").expect("sentence regex is valid"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word regex is valid"));

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "the", "and", "is", "in", "it", "of", "we", "a", "an", "to", "for", "with", "that", "this",
        "on", "was", "are", "as", "but", "be", "have", "has",
    ]
    .into_iter()
    .collect()
});

/// Splits a review into trimmed, non-empty sentence fragments.
pub fn split_sentences(review: &str) -> Vec<String> {
    SENTENCE_BREAK
        .split(review.trim())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn tokens(fragment: &str) -> Vec<String> {
    let lower = fragment.to_lowercase();
    WORD.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// Content-word frequencies accumulated over every fragment.
pub fn term_frequencies(fragments: &[String]) -> HashMap<String, usize> {
    let mut freq = HashMap::new();
    for fragment in fragments {
        for word in tokens(fragment) {
            if STOPWORDS.contains(word.as_str()) {
                continue;
            }
            *freq.entry(word).or_insert(0) += 1;
        }
    }
    freq
}

/// Sum of the global frequencies of a fragment's tokens.
pub fn score_fragment(fragment: &str, freq: &HashMap<String, usize>) -> usize {
    tokens(fragment)
        .iter()
        .map(|w| freq.get(w).copied().unwrap_or(0))
        .sum()
}

/// Picks up to [`MAX_EXCERPTS`] distinct fragments, highest score first.
/// Ties keep the order in which fragments were first encountered.
pub fn top_fragments<S: AsRef<str>>(reviews: &[S]) -> Vec<String> {
    let fragments: Vec<String> = reviews
        .iter()
        .flat_map(|r| split_sentences(r.as_ref()))
        .collect();
    let freq = term_frequencies(&fragments);

    let mut scored: Vec<(usize, &String)> = fragments
        .iter()
        .map(|f| (score_fragment(f, &freq), f))
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut top = uniq_keep_order(scored.into_iter().map(|(_, f)| f.as_str()));
    top.truncate(MAX_EXCERPTS);
    top
}

/// Builds the summary text from the review set and its aggregate stats.
pub fn summarize<S: AsRef<str>>(reviews: &[S], stats: &ReviewStats) -> String {
    let excerpts = top_fragments(reviews);
    let tone = stats.tone.as_str().to_lowercase();
    let b = &stats.breakdown;

    if excerpts.is_empty() {
        return format!(
            "Across {} reviews analyzed, sentiment is {}: {:.1}% positive, {:.1}% neutral and {:.1}% negative.",
            stats.review_count, tone, b.positive, b.neutral, b.negative
        );
    }

    format!(
        "{} Overall sentiment is {}: {:.1}% positive, {:.1}% neutral, {:.1}% negative (based on {} reviews).",
        excerpts.join(" "),
        tone,
        b.positive,
        b.neutral,
        b.negative,
        stats.review_count
    )
}
