use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{propagate_request_id, request_span};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(propagate_request_id))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Titles
        .route("/titles/search", get(handlers::search_titles))
        .route("/titles/:id", get(handlers::get_title))
        // Ratings
        .route("/ratings", get(handlers::get_ratings))
        .route("/ratings/:id", put(handlers::rate_title))
        // Recommendations
        .route("/recommendations", post(handlers::recommend))
        // History
        .route(
            "/history/search",
            get(handlers::get_search_history).delete(handlers::clear_search_history),
        )
        .route(
            "/history/watch",
            get(handlers::get_watch_history)
                .post(handlers::add_to_watch_history)
                .delete(handlers::clear_watch_history),
        )
}
