//! Keyword-based review classification.
//!
//! Each review is scored against two fixed indicator lists. Matching is
//! case-insensitive substring counting, so "recommendation" still counts as
//! a hit for "recommend". No tokenization happens at this stage.

use serde::Serialize;
use utoipa::ToSchema;

// Positive indicators
pub static POSITIVE_WORDS: &[&str] = &[
    "good", "great", "amazing", "excellent", "premium", "smooth", "recommend", "solid", "love",
    "best", "awesome", "fantastic",
];

// Negative indicators
pub static NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "terrible", "disappointing", "not", "stopped", "delayed", "damaged", "awful",
    "worst", "hate", "problem",
];

/// Sentiment label, used both per review and as the tone of a review set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Majority rule shared by the per-review label and the aggregate tone.
    pub fn from_counts(positive: usize, negative: usize) -> Self {
        if positive > negative {
            Sentiment::Positive
        } else if negative > positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A review together with its lexical score. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedReview {
    pub text: String,
    pub label: Sentiment,
    /// In [-1, 1]; 0.0 when the review has no indicator hits.
    pub polarity: f64,
    pub positive_hits: usize,
    pub negative_hits: usize,
}

/// Counts non-overlapping occurrences of every indicator in `text`.
/// `text` must already be lower-cased.
fn count_hits(text: &str, words: &[&str]) -> usize {
    words.iter().map(|w| text.matches(w).count()).sum()
}

/// Scores and labels a single review.
pub fn classify(text: &str) -> ClassifiedReview {
    let lowercase_text = text.to_lowercase();
    let positive_hits = count_hits(&lowercase_text, POSITIVE_WORDS);
    let negative_hits = count_hits(&lowercase_text, NEGATIVE_WORDS);

    let total = positive_hits + negative_hits;
    let polarity = if total == 0 {
        0.0
    } else {
        (positive_hits as f64 - negative_hits as f64) / total as f64
    };

    ClassifiedReview {
        text: text.to_string(),
        label: Sentiment::from_counts(positive_hits, negative_hits),
        polarity,
        positive_hits,
        negative_hits,
    }
}

/// Classifies every review, preserving input order.
pub fn classify_all<S: AsRef<str>>(reviews: &[S]) -> Vec<ClassifiedReview> {
    reviews.iter().map(|r| classify(r.as_ref())).collect()
}
