use serde::Deserialize;

use crate::services::features::extract_features;

mod history;
mod rating;
mod title;

pub use history::{
    relative_age, SearchHistory, SearchHistoryEntry, WatchHistory, WatchHistoryEntry,
    SEARCH_HISTORY_CAP, WATCH_HISTORY_CAP,
};
pub use rating::{RatingMap, LIKED_THRESHOLD, MAX_RATING};
pub use title::{FeatureVector, ScoredCandidate, SearchResult, Title, FEATURE_DIMENSIONS};

/// Genre recorded when the provider lists none
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Year assumed when the provider's year is unparsable
pub const DEFAULT_YEAR: i32 = 2020;

/// Rating assumed when the provider's rating is unparsable
pub const DEFAULT_RATING: f64 = 7.0;

/// Placeholder OMDb uses for absent fields
const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// OMDb API Types
// ============================================================================

/// Response of `?s=` searches
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Option<Vec<OmdbSearchItem>>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbSearchResponse {
    /// Hits in provider order; a "False" response or missing list is empty
    pub fn into_results(self) -> Vec<SearchResult> {
        if self.response != "True" {
            return Vec::new();
        }
        self.search
            .unwrap_or_default()
            .into_iter()
            .map(SearchResult::from)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
    #[serde(rename = "Type", default)]
    pub title_type: String,
}

impl From<OmdbSearchItem> for SearchResult {
    fn from(item: OmdbSearchItem) -> Self {
        SearchResult {
            id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster: available(item.poster),
            title_type: item.title_type,
        }
    }
}

/// Response of `?i=` detail lookups
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbTitleDetails {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    #[serde(rename = "Actors", default)]
    pub actors: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbTitleDetails {
    pub fn is_success(&self) -> bool {
        self.response == "True"
    }

    /// Builds a `Title`, defaulting fields that are missing or unparsable
    ///
    /// Returns `None` when the response carries no identifier.
    pub fn into_title(self) -> Option<Title> {
        let id = self.imdb_id.filter(|id| !id.trim().is_empty())?;
        let raw_genre = self.genre.unwrap_or_default();

        Some(Title {
            title: self.title.unwrap_or_else(|| id.clone()),
            id,
            year: parse_year(self.year.as_deref()),
            genre: primary_genre(&raw_genre),
            rating: parse_rating(self.imdb_rating.as_deref()),
            poster: available(self.poster),
            plot: available(self.plot),
            director: available(self.director),
            actors: available(self.actors),
            features: extract_features(&raw_genre),
        })
    }
}

/// First comma-delimited genre, or `UNKNOWN_GENRE`
pub fn primary_genre(raw: &str) -> String {
    raw.split(',')
        .next()
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != NOT_AVAILABLE)
        .unwrap_or(UNKNOWN_GENRE)
        .to_string()
}

/// Leading integer of the year field ("2010–2014" is 2010)
///
/// Zero and unparsable values fall back to `DEFAULT_YEAR`.
pub fn parse_year(raw: Option<&str>) -> i32 {
    let digits: String = raw
        .unwrap_or_default()
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<i32>() {
        Ok(year) if year != 0 => year,
        _ => DEFAULT_YEAR,
    }
}

/// Provider rating as a float; zero, "N/A" and garbage fall back to `DEFAULT_RATING`
pub fn parse_rating(raw: Option<&str>) -> f64 {
    match raw.unwrap_or_default().trim().parse::<f64>() {
        Ok(rating) if rating.is_finite() && rating != 0.0 => rating,
        _ => DEFAULT_RATING,
    }
}

fn available(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && v != NOT_AVAILABLE)
}
