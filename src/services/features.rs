//! Genre-cluster feature vectors and the similarity measure over them.

use crate::models::{FeatureVector, FEATURE_DIMENSIONS};

/// Weight for a cluster the title belongs to
pub const MEMBER_WEIGHT: f64 = 0.8;

/// Weight for a cluster the title does not belong to
pub const NON_MEMBER_WEIGHT: f64 = 0.2;

/// Genre keywords per cluster, in vector order
const CLUSTERS: [&[&str]; FEATURE_DIMENSIONS] = [
    &["drama", "romance"],
    &["action", "thriller", "crime"],
    &["comedy", "family"],
    &["sci-fi", "fantasy", "adventure"],
];

/// Projects a raw genre string onto the genre clusters
///
/// Matching is a case-insensitive substring test against the whole string,
/// so a title can belong to several clusters. An empty string belongs to
/// none and gets the non-member weight everywhere.
pub fn extract_features(raw_genre: &str) -> FeatureVector {
    let genres = raw_genre.to_lowercase();
    let mut features = [NON_MEMBER_WEIGHT; FEATURE_DIMENSIONS];

    for (slot, keywords) in features.iter_mut().zip(CLUSTERS.iter()) {
        if keywords.iter().any(|k| genres.contains(k)) {
            *slot = MEMBER_WEIGHT;
        }
    }

    FeatureVector(features)
}

/// Cosine of the angle between two vectors
///
/// Returns 0.0 when either vector has zero magnitude. Vectors of unequal
/// length are compared over their common prefix.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
