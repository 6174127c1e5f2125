use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::{
    error::{AppError, AppResult},
    models::{RatingMap, ScoredCandidate, Title},
    services::{providers::MovieProvider, scoring::rank_candidates},
};

/// Most liked genres used to seed candidate searches
pub const MAX_SEED_GENRES: usize = 3;

/// Search hits taken per seed genre
pub const CANDIDATES_PER_GENRE: usize = 5;

/// Generates personalized recommendations from the user's ratings
///
/// 1. Resolve details for every rated title (concurrently)
/// 2. Collect the primary genres of liked titles, up to `MAX_SEED_GENRES`
/// 3. For each genre in turn, search and resolve up to
///    `CANDIDATES_PER_GENRE` unrated titles
/// 4. Score, deduplicate and rank the pool
///
/// Provider failures never abort the run; they shrink the pool instead.
pub async fn generate_recommendations(
    provider: &dyn MovieProvider,
    ratings: &RatingMap,
) -> Vec<ScoredCandidate> {
    if ratings.is_empty() {
        tracing::debug!("No ratings yet, skipping recommendation run");
        return Vec::new();
    }

    let start = Instant::now();

    let rated = provider
        .fetch_details_batch(ratings.ids().cloned().collect())
        .await;

    let genres = liked_genres(&rated, ratings);
    if genres.is_empty() {
        tracing::info!(
            rated = ratings.len(),
            resolved = rated.len(),
            "No liked titles to seed recommendations"
        );
        return Vec::new();
    }

    let candidates = gather_candidates(provider, &genres, ratings).await;
    let pool_size = candidates.len();
    let ranked = rank_candidates(candidates, &rated, ratings);

    tracing::info!(
        rated = ratings.len(),
        resolved = rated.len(),
        genres = ?genres,
        pool = pool_size,
        returned = ranked.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Recommendations generated"
    );

    ranked
}

/// Distinct primary genres of liked titles, in rating-map order
pub fn liked_genres(rated: &[Title], ratings: &RatingMap) -> Vec<String> {
    let mut seen = HashSet::new();

    rated
        .iter()
        .filter(|title| ratings.is_liked(&title.id))
        .filter(|title| seen.insert(title.genre.clone()))
        .map(|title| title.genre.clone())
        .take(MAX_SEED_GENRES)
        .collect()
}

/// Searches each genre sequentially and resolves unrated hits
async fn gather_candidates(
    provider: &dyn MovieProvider,
    genres: &[String],
    ratings: &RatingMap,
) -> Vec<Title> {
    let mut pool = Vec::new();

    for genre in genres {
        let hits = match provider.search_titles(genre).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::error!(genre = %genre, error = %e, "Candidate search failed, skipping genre");
                continue;
            }
        };

        let ids: Vec<String> = hits
            .into_iter()
            .take(CANDIDATES_PER_GENRE)
            .map(|hit| hit.id)
            .collect();

        let details = provider.fetch_details_batch(ids).await;
        let before = pool.len();
        pool.extend(details.into_iter().filter(|t| !ratings.contains(&t.id)));

        tracing::debug!(
            genre = %genre,
            added = pool.len() - before,
            "Candidate batch collected"
        );
    }

    pool
}

/// Runs recommendation generation, at most one run at a time
#[derive(Clone)]
pub struct Recommender {
    provider: Arc<dyn MovieProvider>,
    in_flight: Arc<AtomicBool>,
}

/// Marks a run as in flight until dropped
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Recommender {
    pub fn new(provider: Arc<dyn MovieProvider>) -> Self {
        Self {
            provider,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> AppResult<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                AppError::Busy("A recommendation run is already in progress".to_string())
            })?;

        Ok(InFlightGuard {
            flag: Arc::clone(&self.in_flight),
        })
    }

    /// Generates recommendations, rejecting overlapping calls with `AppError::Busy`
    pub async fn recommend(&self, ratings: &RatingMap) -> AppResult<Vec<ScoredCandidate>> {
        let _guard = self.try_begin()?;
        Ok(generate_recommendations(self.provider.as_ref(), ratings).await)
    }
}
