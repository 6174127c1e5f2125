use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{
        relative_age, RatingMap, ScoredCandidate, SearchHistoryEntry, SearchResult, Title,
        WatchHistoryEntry,
    },
    services::title_search,
    store::{records::persist, RecordKey},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    /// Signed so out-of-range integers reach rating validation
    pub rating: i64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<ScoredCandidate>,
    pub rated_count: usize,
}

/// A history entry with its age rendered for display
#[derive(Debug, Serialize)]
pub struct HistoryItem<T> {
    #[serde(flatten)]
    pub entry: T,
    pub age: String,
}

impl<T: Clone> HistoryItem<T> {
    fn collect(entries: &[T], timestamp: impl Fn(&T) -> DateTime<Utc>, now: DateTime<Utc>) -> Vec<Self> {
        entries
            .iter()
            .map(|entry| HistoryItem {
                age: relative_age(timestamp(entry), now),
                entry: entry.clone(),
            })
            .collect()
    }
}

fn search_history_view(entries: &[SearchHistoryEntry]) -> Vec<HistoryItem<SearchHistoryEntry>> {
    HistoryItem::collect(entries, |e| e.timestamp, Utc::now())
}

fn watch_history_view(entries: &[WatchHistoryEntry]) -> Vec<HistoryItem<WatchHistoryEntry>> {
    HistoryItem::collect(entries, |e| e.timestamp, Utc::now())
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Searches titles and records worthwhile queries in the search history
pub async fn search_titles(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<SearchResult>> {
    let query = params.q.trim();
    let results = title_search::search_titles(state.provider.as_ref(), query).await;

    if title_search::should_record(query, &results) {
        // Held across the write so saves of one record land in order
        let mut user = state.user.write().await;
        user.search_history
            .record(query, results.len(), Utc::now());
        persist(
            state.store.as_ref(),
            RecordKey::SearchHistory,
            &user.search_history,
        )
        .await;
    }

    Json(results)
}

/// Full details for one title
pub async fn get_title(
    State(state): State<AppState>,
    Path(title_id): Path<String>,
) -> AppResult<Json<Title>> {
    match state.provider.fetch_details(&title_id).await {
        Ok(title) => Ok(Json(title)),
        Err(e) => {
            tracing::warn!(title_id = %title_id, error = %e, "Error fetching movie details");
            Err(AppError::NotFound(format!("No details for {}", title_id)))
        }
    }
}

/// Current rating map
pub async fn get_ratings(State(state): State<AppState>) -> Json<RatingMap> {
    Json(state.user.read().await.ratings.clone())
}

/// Sets the user's rating for a title
pub async fn rate_title(
    State(state): State<AppState>,
    Path(title_id): Path<String>,
    payload: Result<Json<RateRequest>, JsonRejection>,
) -> AppResult<Json<RatingMap>> {
    let Json(request) = payload?;
    let mut user = state.user.write().await;
    user.ratings.rate(&title_id, request.rating)?;
    persist(state.store.as_ref(), RecordKey::Ratings, &user.ratings).await;

    tracing::info!(title_id = %title_id, rating = request.rating, "Title rated");

    Ok(Json(user.ratings.clone()))
}

/// Runs a recommendation pass over the current ratings
pub async fn recommend(State(state): State<AppState>) -> AppResult<Json<RecommendationsResponse>> {
    // Snapshot so the lock is not held across provider calls
    let ratings = state.user.read().await.ratings.clone();
    let recommendations = state.recommender.recommend(&ratings).await?;

    Ok(Json(RecommendationsResponse {
        recommendations,
        rated_count: ratings.len(),
    }))
}

pub async fn get_search_history(
    State(state): State<AppState>,
) -> Json<Vec<HistoryItem<SearchHistoryEntry>>> {
    let user = state.user.read().await;
    Json(search_history_view(user.search_history.entries()))
}

pub async fn clear_search_history(State(state): State<AppState>) -> StatusCode {
    let mut user = state.user.write().await;
    user.search_history.clear();
    persist(
        state.store.as_ref(),
        RecordKey::SearchHistory,
        &user.search_history,
    )
    .await;
    StatusCode::NO_CONTENT
}

pub async fn get_watch_history(
    State(state): State<AppState>,
) -> Json<Vec<HistoryItem<WatchHistoryEntry>>> {
    let user = state.user.read().await;
    Json(watch_history_view(user.watch_history.entries()))
}

/// Records a picked search result at the front of the watch history
pub async fn add_to_watch_history(
    State(state): State<AppState>,
    payload: Result<Json<SearchResult>, JsonRejection>,
) -> AppResult<Json<Vec<HistoryItem<WatchHistoryEntry>>>> {
    let Json(result) = payload?;
    if result.id.trim().is_empty() {
        return Err(AppError::InvalidInput("Title id cannot be empty".to_string()));
    }

    let mut user = state.user.write().await;
    user.watch_history.record(&result, Utc::now());
    persist(
        state.store.as_ref(),
        RecordKey::WatchHistory,
        &user.watch_history,
    )
    .await;

    Ok(Json(watch_history_view(user.watch_history.entries())))
}

pub async fn clear_watch_history(State(state): State<AppState>) -> StatusCode {
    let mut user = state.user.write().await;
    user.watch_history.clear();
    persist(
        state.store.as_ref(),
        RecordKey::WatchHistory,
        &user.watch_history,
    )
    .await;
    StatusCode::NO_CONTENT
}
