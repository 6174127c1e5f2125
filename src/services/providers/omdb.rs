//! OMDb API provider
//!
//! Title search: `/?s=<query>&type=movie` → list of hits
//! Details: `/?i=<imdb id>&plot=full` → full record including genre and rating
//!
//! Results are never cached; every recommendation run sees fresh metadata.

use crate::{
    error::{AppError, AppResult},
    models::{OmdbSearchResponse, OmdbTitleDetails, SearchResult, Title},
    services::providers::MovieProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const SEARCH_TYPE: &str = "movie";
const PLOT_LENGTH: &str = "full";

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, params: &[(&str, &str)]) -> AppResult<reqwest::Response> {
        let url = format!("{}/", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl MovieProvider for OmdbProvider {
    async fn search_titles(&self, query: &str) -> AppResult<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let response = self.get(&[("s", query), ("type", SEARCH_TYPE)]).await?;
        let search: OmdbSearchResponse = response.json().await?;

        if let Some(reason) = search.error.as_deref() {
            tracing::debug!(query = %query, reason = %reason, "OMDb search returned no results");
        }

        let results = search.into_results();

        tracing::info!(
            query = %query,
            results = results.len(),
            provider = "omdb",
            "Title search completed"
        );

        Ok(results)
    }

    async fn fetch_details(&self, title_id: &str) -> AppResult<Title> {
        if title_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Title id cannot be empty".to_string()));
        }

        let response = self.get(&[("i", title_id), ("plot", PLOT_LENGTH)]).await?;
        let response_text = response.text().await?;

        let details: OmdbTitleDetails = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize OMDb response"
            );
            AppError::ExternalApi(format!("Failed to parse OMDb response: {}", e))
        })?;

        if !details.is_success() {
            let reason = details.error.unwrap_or_else(|| "unknown title".to_string());
            return Err(AppError::NotFound(format!("{}: {}", title_id, reason)));
        }

        let title = details.into_title().ok_or_else(|| {
            AppError::ExternalApi(format!("OMDb response for {} has no imdbID", title_id))
        })?;

        tracing::debug!(
            title_id = %title.id,
            genre = %title.genre,
            rating = title.rating,
            provider = "omdb",
            "Details fetched"
        );

        Ok(title)
    }

    fn clone_for_task(&self) -> Box<dyn MovieProvider> {
        Box::new(self.clone())
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
