//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/program", get(http::http_get_program))
        .route("/api/v1/concepts", get(http::http_list_concepts))
        .route("/api/v1/concepts/:id", get(http::http_get_concept))
        .route("/api/v1/reviews", get(http::http_get_reviews))
        .route("/api/v1/reviews/stats", get(http::http_get_review_stats))
        .route("/api/v1/exercises/day/:day", get(http::http_get_day_exercises))
        .route(
            "/api/v1/exercises/day/:day/unlock",
            get(http::http_get_day_unlock),
        )
        .route("/api/v1/exercises/submit", post(http::http_post_submit))
        .route("/api/v1/unlock", post(http::http_post_unlock))
        .route("/api/v1/recommend", get(http::http_get_recommendations))
        .route("/api/v1/progress", get(http::http_get_progress))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
