//! Label submission endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::super::AppState;
use super::helpers::service_error_response;

/// Body of `POST /label`.
#[derive(Debug, Deserialize)]
pub struct LabelSubmission {
    pub username: String,
    pub filename: String,
    pub text: String,
}

/// Record one labeling.
pub async fn submit_label(
    State(state): State<AppState>,
    Json(submission): Json<LabelSubmission>,
) -> Response {
    match state
        .labeling
        .submit_label(&submission.username, &submission.filename, &submission.text)
        .await
    {
        Ok(labeling) => (StatusCode::CREATED, Json(labeling)).into_response(),
        Err(e) => service_error_response(e),
    }
}
