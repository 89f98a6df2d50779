//! Review analysis pipeline and the report it produces.
//!
//! reviews -> classified reviews -> {stats, highlights, summary, rating} -> report.
//! Everything here is synchronous and infallible; provider failures are dealt
//! with before the pipeline is entered.

use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::highlights::{self, DEFAULT_SNIPPET_WORDS, MAX_HIGHLIGHTS};
use crate::rating;
use crate::sentiment::{self, Sentiment};
use crate::stats::{self, SentimentBreakdown};
use crate::summarizer;

/// Page metadata passed through to the report untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Metadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Where the analyzed reviews came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOrigin {
    Flipkart,
    Amazon,
    /// Built-in fallback corpus
    Sample,
    /// Supplied by the caller
    Provided,
    /// Nothing collected and the sample corpus is disabled
    Unavailable,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub snippet_words: usize,
    pub max_highlights: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            snippet_words: DEFAULT_SNIPPET_WORDS,
            max_highlights: MAX_HIGHLIGHTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Report {
    pub summary: String,
    pub rating: f64,
    pub tone: Sentiment,
    pub sentiment_breakdown: SentimentBreakdown,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub review_count: usize,
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
    pub review_source: ReviewOrigin,
}

/// Runs the full pipeline over `reviews`.
pub fn analyze<S: AsRef<str>>(
    reviews: &[S],
    metadata: Metadata,
    url: &str,
    origin: ReviewOrigin,
    options: AnalysisOptions,
) -> Report {
    let classified = sentiment::classify_all(reviews);
    let stats = stats::aggregate(&classified);
    let highlights = highlights::extract(&classified, options.max_highlights);
    let summary = summarizer::summarize(reviews, &stats);
    let rating = rating::synthesize(&classified);

    let (positive_hits, negative_hits) = classified
        .iter()
        .fold((0, 0), |(p, n), r| (p + r.positive_hits, n + r.negative_hits));
    debug!(
        "Analyzed {} reviews: {} positive, {} negative, {} neutral ({}/{} indicator hits), rating {}",
        stats.review_count,
        stats.positive_count,
        stats.negative_count,
        stats.neutral_count,
        positive_hits,
        negative_hits,
        rating
    );

    Report {
        summary,
        rating,
        tone: stats.tone,
        sentiment_breakdown: stats.breakdown,
        pros: highlights.display_pros(options.snippet_words),
        cons: highlights.display_cons(options.snippet_words),
        review_count: stats.review_count,
        title: metadata.title.unwrap_or_default(),
        description: metadata.description.unwrap_or_default(),
        image: metadata.image.unwrap_or_default(),
        url: url.to_string(),
        review_source: origin,
    }
}
