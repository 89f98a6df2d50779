//! Aggregate sentiment percentages and overall tone.

use serde::Serialize;
use utoipa::ToSchema;

use crate::sentiment::{ClassifiedReview, Sentiment};

/// Percentage of reviews per label, each rounded to one decimal.
///
/// The three values are rounded independently and are not renormalized, so
/// their sum may drift from 100.0 by a tenth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, ToSchema)]
pub struct SentimentBreakdown {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewStats {
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub review_count: usize,
    pub breakdown: SentimentBreakdown,
    pub tone: Sentiment,
}

/// Rounds to one decimal place on the exact decimal value of `value`, with
/// exact ties going to the even digit (6.25 -> 6.2, 6.75 -> 6.8).
pub fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // fixed-precision formatting is correctly rounded, ties to even
    format!("{:.1}", value).parse().unwrap_or(value)
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(count as f64 / total as f64 * 100.0)
}

pub fn aggregate(reviews: &[ClassifiedReview]) -> ReviewStats {
    let count = |label: Sentiment| reviews.iter().filter(|r| r.label == label).count();
    let positive_count = count(Sentiment::Positive);
    let negative_count = count(Sentiment::Negative);
    let neutral_count = count(Sentiment::Neutral);
    let review_count = reviews.len();

    ReviewStats {
        positive_count,
        negative_count,
        neutral_count,
        review_count,
        breakdown: SentimentBreakdown {
            positive: percent(positive_count, review_count),
            negative: percent(negative_count, review_count),
            neutral: percent(neutral_count, review_count),
        },
        tone: Sentiment::from_counts(positive_count, negative_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::classify_all;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input() {
        let stats = aggregate(&[]);
        assert_eq!(stats.review_count, 0);
        assert_eq!(stats.breakdown, SentimentBreakdown::default());
        assert_eq!(stats.tone, Sentiment::Neutral);
    }

    #[test]
    fn test_even_split_is_neutral_tone() {
        let reviews = classify_all(&[
            "Excellent product, amazing quality.",
            "Terrible, it stopped working.",
        ]);
        let stats = aggregate(&reviews);
        assert_eq!(
            stats.breakdown,
            SentimentBreakdown { positive: 50.0, negative: 50.0, neutral: 0.0 }
        );
        assert_eq!(stats.tone, Sentiment::Neutral);
    }

    #[test]
    fn test_thirds_drift() {
        let reviews = classify_all(&["great", "awful", "fine"]);
        let stats = aggregate(&reviews);
        assert_eq!(stats.breakdown.positive, 33.3);
        assert_eq!(stats.breakdown.negative, 33.3);
        assert_eq!(stats.breakdown.neutral, 33.3);
        // not renormalized
        assert!((stats.breakdown.positive + stats.breakdown.negative + stats.breakdown.neutral - 99.9).abs() < 1e-9);
    }

    #[test]
    fn test_tone_follows_majority() {
        let reviews = classify_all(&["great", "love it", "awful", "fine", "fine"]);
        let stats = aggregate(&reviews);
        assert_eq!(stats.positive_count, 2);
        assert_eq!(stats.negative_count, 1);
        assert_eq!(stats.neutral_count, 2);
        assert_eq!(stats.tone, Sentiment::Positive);
        assert_eq!(stats.breakdown.neutral, 40.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(14.2857), 14.3);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_round1_ties_to_even() {
        assert_eq!(round1(6.25), 6.2);
        assert_eq!(round1(18.75), 18.8);
        assert_eq!(round1(3.25), 3.2);
        // 0.15 is stored just below the tie
        assert_eq!(round1(0.15), 0.1);
    }

    #[test]
    fn test_one_in_sixteen_rounds_to_even() {
        let mut texts = vec!["great"];
        texts.extend(std::iter::repeat("fine").take(15));
        let stats = aggregate(&classify_all(&texts));
        assert_eq!(stats.breakdown.positive, 6.2);
        assert_eq!(stats.breakdown.neutral, 93.8);
    }
}
