//! Pros and cons picked from labeled reviews.

use std::collections::HashSet;

use crate::sentiment::{ClassifiedReview, Sentiment};

pub const MAX_HIGHLIGHTS: usize = 8;
pub const DEFAULT_SNIPPET_WORDS: usize = 10;

pub const FALLBACK_PRO: &str = "Good performance";
pub const FALLBACK_CON: &str = "Some users reported issues";

/// Full review texts selected as pros and cons, deduplicated and bounded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Highlights {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Stable dedup: the first occurrence of each string wins.
pub fn uniq_keep_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let item = item.into();
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

fn select(reviews: &[ClassifiedReview], label: Sentiment, limit: usize) -> Vec<String> {
    let mut texts = uniq_keep_order(
        reviews
            .iter()
            .filter(|r| r.label == label)
            .map(|r| r.text.as_str()),
    );
    texts.truncate(limit);
    texts
}

pub fn extract(reviews: &[ClassifiedReview], limit: usize) -> Highlights {
    Highlights {
        pros: select(reviews, Sentiment::Positive, limit),
        cons: select(reviews, Sentiment::Negative, limit),
    }
}

/// Trims `text` to its first `max_words` whitespace-separated words.
///
/// Texts within budget come back unchanged. Longer ones lose any trailing
/// punctuation and get an ellipsis.
pub fn short_snippet(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }
    let head = words[..max_words].join(" ");
    let head = head.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?'));
    format!("{}...", head)
}

fn display_list(texts: &[String], max_words: usize, fallback: &str) -> Vec<String> {
    let shortened = uniq_keep_order(texts.iter().map(|t| short_snippet(t, max_words)));
    if shortened.is_empty() {
        vec![fallback.to_string()]
    } else {
        shortened
    }
}

impl Highlights {
    /// Display bullets for pros, never empty.
    pub fn display_pros(&self, max_words: usize) -> Vec<String> {
        display_list(&self.pros, max_words, FALLBACK_PRO)
    }

    /// Display bullets for cons, never empty.
    pub fn display_cons(&self, max_words: usize) -> Vec<String> {
        display_list(&self.cons, max_words, FALLBACK_CON)
    }
}
