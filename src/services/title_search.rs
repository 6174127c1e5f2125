use crate::{models::SearchResult, services::providers::MovieProvider};

/// Queries shorter than this are not sent to the provider
pub const MIN_QUERY_CHARS: usize = 2;

/// Queries must be longer than this to be recorded in search history
pub const MIN_RECORDED_QUERY_CHARS: usize = 2;

/// Most hits returned to the caller
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Service function for title search
///
/// Delegates to the configured provider and truncates to
/// `MAX_SEARCH_RESULTS`. The query is trimmed first; short queries and
/// provider failures both yield an empty list.
pub async fn search_titles(provider: &dyn MovieProvider, query: &str) -> Vec<SearchResult> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    match provider.search_titles(query).await {
        Ok(mut results) => {
            results.truncate(MAX_SEARCH_RESULTS);
            results
        }
        Err(e) => {
            tracing::error!(query = %query, provider = provider.name(), error = %e, "Search error");
            Vec::new()
        }
    }
}

/// Whether a completed search belongs in the search history
pub fn should_record(query: &str, results: &[SearchResult]) -> bool {
    !results.is_empty() && query.trim().chars().count() > MIN_RECORDED_QUERY_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockMovieProvider;
    use mockall::predicate::eq;

    fn hits(n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| SearchResult {
                id: format!("tt{:07}", i),
                title: format!("Hit {}", i),
                year: "2001".to_string(),
                poster: None,
                title_type: "movie".to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_short_query_skips_provider() {
        let provider = MockMovieProvider::new();
        assert!(search_titles(&provider, "").await.is_empty());
        assert!(search_titles(&provider, "a").await.is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_query_skips_provider() {
        let mut provider = MockMovieProvider::new();
        provider.expect_search_titles().never();

        assert!(search_titles(&provider, "    ").await.is_empty());
        assert!(search_titles(&provider, "\t x \n").await.is_empty());
    }

    #[tokio::test]
    async fn test_query_is_trimmed() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_search_titles()
            .with(eq("alien"))
            .times(1)
            .returning(|_| Ok(hits(2)));

        assert_eq!(search_titles(&provider, "  alien ").await.len(), 2);
    }

    #[tokio::test]
    async fn test_truncates_results() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_search_titles()
            .with(eq("star"))
            .times(1)
            .returning(|_| Ok(hits(25)));

        let results = search_titles(&provider, "star").await;
        assert_eq!(results.len(), MAX_SEARCH_RESULTS);
        assert_eq!(results[0].id, "tt0000000");
    }

    #[tokio::test]
    async fn test_provider_error_is_empty() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_search_titles()
            .returning(|_| Err(AppError::ExternalApi("Invalid API key!".to_string())));
        provider.expect_name().return_const("mock");

        assert!(search_titles(&provider, "alien").await.is_empty());
    }

    #[test]
    fn test_should_record() {
        assert!(should_record("alien", &hits(1)));
        assert!(!should_record("alien", &[]));
        assert!(!should_record("up", &hits(3)));
        assert!(should_record("her", &hits(3)));
        assert!(!should_record(" up ", &hits(3)));
    }
}
