//! API endpoint handlers.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use super::super::AppState;
use super::helpers::service_error_response;

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// List the stored label vocabulary.
pub async fn api_labels(State(state): State<AppState>) -> Response {
    match state.labeling.repos().labels.get_all().await {
        Ok(labels) => Json(labels).into_response(),
        Err(e) => service_error_response(e.into()),
    }
}
