use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use reelmatch_api::{
    api::{create_router, AppState},
    config::Config,
    services::providers::{MovieProvider, OmdbProvider},
    store::create_store,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelmatch_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let provider: Arc<dyn MovieProvider> = Arc::new(
        OmdbProvider::new(
            config.omdb_api_key.clone(),
            config.omdb_api_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
        .context("Failed to build OMDb client")?,
    );

    let store = create_store(&config)
        .await
        .context("Failed to initialize store")?;

    // Initialize application state
    let state = AppState::load(provider, store).await;

    // Create the router with all routes
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
