//! Movie metadata provider abstraction
//!
//! Providers expose a free-text search returning lightweight hits and a
//! detail lookup returning a fully populated `Title`. The recommendation
//! run only ever talks to metadata through this trait.

use crate::{
    error::AppResult,
    models::{SearchResult, Title},
};

pub mod omdb;

pub use omdb::OmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Search movies by free text
    ///
    /// A query with no matches is an empty list, not an error.
    async fn search_titles(&self, query: &str) -> AppResult<Vec<SearchResult>>;

    /// Fetch full details for one title
    ///
    /// Returns `AppError::NotFound` when the provider does not know the id.
    async fn fetch_details(&self, title_id: &str) -> AppResult<Title>;

    /// Fetch details for several titles concurrently
    ///
    /// Failed lookups are logged and skipped; the rest keep their
    /// submission order.
    async fn fetch_details_batch(&self, title_ids: Vec<String>) -> Vec<Title> {
        let mut tasks = Vec::with_capacity(title_ids.len());

        for title_id in title_ids {
            let provider = self.clone_for_task();
            let task = tokio::spawn(async move {
                let result = provider.fetch_details(&title_id).await;
                (title_id, result)
            });
            tasks.push(task);
        }

        let mut titles = Vec::with_capacity(tasks.len());
        let mut failures = 0usize;

        for task in tasks {
            match task.await {
                Ok((_, Ok(title))) => titles.push(title),
                Ok((title_id, Err(e))) => {
                    tracing::warn!(title_id = %title_id, error = %e, "Detail lookup failed, skipping title");
                    failures += 1;
                }
                Err(e) => {
                    tracing::error!(provider = self.name(), error = %e, "Detail lookup task join error");
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            tracing::warn!(
                provider = self.name(),
                success_count = titles.len(),
                error_count = failures,
                "Partial detail fetch failure"
            );
        }

        titles
    }

    /// Clone provider for parallel task execution
    ///
    /// Required because providers need to be moved into tokio tasks.
    fn clone_for_task(&self) -> Box<dyn MovieProvider>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
