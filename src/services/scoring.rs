//! Hybrid content/popularity scoring of candidate titles.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{RatingMap, ScoredCandidate, Title, LIKED_THRESHOLD, MAX_RATING};
use crate::services::features::cosine_similarity;

/// Weight of the content-similarity component
pub const CONTENT_WEIGHT: f64 = 0.7;

/// Divisor turning a 0-10 provider rating into the popularity prior
pub const POPULARITY_DIVISOR: f64 = 20.0;

/// Most recommendations returned from one run
pub const TOP_N: usize = 5;

/// Sum of similarities to liked titles, each weighted by rating / 5
///
/// Titles rated below the liked threshold contribute nothing.
pub fn content_score(candidate: &Title, rated: &[Title], ratings: &RatingMap) -> f64 {
    rated
        .iter()
        .filter_map(|r| {
            let rating = ratings.get(&r.id).filter(|&v| v >= LIKED_THRESHOLD)?;
            let similarity =
                cosine_similarity(candidate.features.as_slice(), r.features.as_slice());
            Some(similarity * f64::from(rating) / f64::from(MAX_RATING))
        })
        .sum()
}

/// Blends content similarity with the provider's rating
pub fn hybrid_score(content: f64, external_rating: f64) -> f64 {
    content * CONTENT_WEIGHT + external_rating / POPULARITY_DIVISOR
}

/// Scores, deduplicates and ranks candidates, keeping the best `TOP_N`
///
/// Duplicate identifiers keep the last occurrence. Equal scores are ordered
/// by provider rating (descending), then identifier (ascending).
pub fn rank_candidates(
    candidates: Vec<Title>,
    rated: &[Title],
    ratings: &RatingMap,
) -> Vec<ScoredCandidate> {
    let mut unique: HashMap<String, ScoredCandidate> = HashMap::with_capacity(candidates.len());

    for title in candidates {
        let score = hybrid_score(content_score(&title, rated, ratings), title.rating);
        unique.insert(title.id.clone(), ScoredCandidate { title, score });
    }

    let mut ranked: Vec<ScoredCandidate> = unique.into_values().collect();
    ranked.sort_by(compare_ranked);
    ranked.truncate(TOP_N);
    ranked
}

fn compare_ranked(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.title.rating.total_cmp(&a.title.rating))
        .then_with(|| a.title.id.cmp(&b.title.id))
}
