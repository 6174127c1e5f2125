use serde::{Deserialize, Serialize};

/// Number of coarse genre clusters a title is projected onto
pub const FEATURE_DIMENSIONS: usize = 4;

/// Genre-cluster membership encoding used for similarity
///
/// One slot per cluster, in order: drama/romance, action/thriller/crime,
/// comedy/family, sci-fi/fantasy/adventure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_DIMENSIONS]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// A movie with full details from the metadata provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    /// External identifier (IMDb id, e.g. "tt1375666")
    pub id: String,
    pub title: String,
    pub year: i32,
    /// First genre listed by the provider
    pub genre: String,
    /// Provider rating on a 0-10 scale
    pub rating: f64,
    pub poster: Option<String>,
    pub plot: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub features: FeatureVector,
}

/// A title paired with its hybrid recommendation score
///
/// Scores are only comparable within a single scoring run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub title: Title,
    pub score: f64,
}

/// A lightweight search hit, before details are resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    /// Year as delivered by the provider ("2010", "2010–2014")
    #[serde(default)]
    pub year: String,
    pub poster: Option<String>,
    #[serde(rename = "type", default)]
    pub title_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_title() -> Title {
        Title {
            id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: 2010,
            genre: "Action".to_string(),
            rating: 8.8,
            poster: None,
            plot: Some("A thief who steals corporate secrets".to_string()),
            director: Some("Christopher Nolan".to_string()),
            actors: None,
            features: FeatureVector([0.2, 0.8, 0.2, 0.8]),
        }
    }

    #[test]
    fn test_scored_candidate_flattens_title() {
        let candidate = ScoredCandidate {
            title: sample_title(),
            score: 1.25,
        };

        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["id"], "tt1375666");
        assert_eq!(json["genre"], "Action");
        assert_eq!(json["score"], 1.25);
        assert_eq!(json["features"], serde_json::json!([0.2, 0.8, 0.2, 0.8]));
    }

    #[test]
    fn test_search_result_type_field() {
        let result = SearchResult {
            id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            poster: None,
            title_type: "movie".to_string(),
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""type":"movie""#));

        let back: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
