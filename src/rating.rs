//! Star rating derived from average review polarity.

use crate::sentiment::ClassifiedReview;
use crate::stats::round1;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// Mean polarity, 0.0 for an empty set.
pub fn average_polarity(reviews: &[ClassifiedReview]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    reviews.iter().map(|r| r.polarity).sum::<f64>() / reviews.len() as f64
}

/// Linear map of [-1, 1] onto [1, 5], clamped and rounded to one decimal.
pub fn rating_from_polarity(avg_polarity: f64) -> f64 {
    let raw = ((avg_polarity + 1.0) / 2.0) * 4.0 + 1.0;
    round1(raw.clamp(MIN_RATING, MAX_RATING))
}

pub fn synthesize(reviews: &[ClassifiedReview]) -> f64 {
    rating_from_polarity(average_polarity(reviews))
}
