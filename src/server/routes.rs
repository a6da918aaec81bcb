//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Labeling workflow
        .route("/next-label/:username", get(handlers::next_label_page))
        .route("/label", post(handlers::submit_label))
        .route("/image/:filename", get(handlers::serve_image))
        // JSON API
        .route("/api/next/:username", get(handlers::api_next))
        .route("/api/labels", get(handlers::api_labels))
        .route("/health", get(handlers::health))
        // Static assets (CSS/JS)
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/label.js", get(handlers::serve_js))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
