use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use reelmatch_api::{
    error::{AppError, AppResult},
    models::{SearchResult, Title},
    services::{features::extract_features, providers::MovieProvider},
};

/// Builds a title the way the OMDb provider would
pub fn title(id: &str, name: &str, genre: &str, rating: f64) -> Title {
    Title {
        id: id.to_string(),
        title: name.to_string(),
        year: 2010,
        genre: genre.split(',').next().unwrap_or_default().trim().to_string(),
        rating,
        poster: None,
        plot: Some(format!("Plot of {}", name)),
        director: None,
        actors: None,
        features: extract_features(genre),
    }
}

/// Pauses the first detail lookup until released
pub struct Gate {
    armed: AtomicBool,
    pub entered: Notify,
    pub release: Notify,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            armed: AtomicBool::new(true),
            entered: Notify::new(),
            release: Notify::new(),
        })
    }
}

/// In-memory stand-in for the metadata API
#[derive(Clone, Default)]
pub struct FakeProvider {
    titles: Arc<HashMap<String, Title>>,
    searches: Arc<HashMap<String, Vec<String>>>,
    pub calls: Arc<AtomicUsize>,
    gate: Option<Arc<Gate>>,
}

impl FakeProvider {
    pub fn new(titles: Vec<Title>, searches: &[(&str, &[&str])]) -> Self {
        Self {
            titles: Arc::new(titles.into_iter().map(|t| (t.id.clone(), t)).collect()),
            searches: Arc::new(
                searches
                    .iter()
                    .map(|(query, ids)| {
                        (
                            query.to_string(),
                            ids.iter().map(|id| id.to_string()).collect(),
                        )
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MovieProvider for FakeProvider {
    async fn search_titles(&self, query: &str) -> AppResult<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let ids = self.searches.get(query).cloned().unwrap_or_default();
        Ok(ids
            .into_iter()
            .map(|id| {
                let name = self
                    .titles
                    .get(&id)
                    .map(|t| t.title.clone())
                    .unwrap_or_else(|| id.clone());
                SearchResult {
                    id,
                    title: name,
                    year: "2010".to_string(),
                    poster: None,
                    title_type: "movie".to_string(),
                }
            })
            .collect())
    }

    async fn fetch_details(&self, title_id: &str) -> AppResult<Title> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.gate.as_ref().filter(|g| g.armed.swap(false, Ordering::SeqCst)) {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.titles
            .get(title_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(title_id.to_string()))
    }

    fn clone_for_task(&self) -> Box<dyn MovieProvider> {
        Box::new(self.clone())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}
