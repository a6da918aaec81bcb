//! Next-image handlers: the labeling page and its JSON twin.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use super::super::template_structs::{CompleteTemplate, ErrorTemplate, NextLabelTemplate};
use super::super::AppState;
use super::helpers::service_error_response;
use crate::assignment::Selection;
use crate::services::ServiceError;

/// Render the labeling page for the annotator's next image.
pub async fn next_label_page(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Response {
    let selection = match state.labeling.next_for(&username).await {
        Ok((_, selection)) => selection,
        Err(e) => {
            let status = match e {
                ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => {
                    tracing::error!("Failed to select next image: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let message = e.to_string();
            let template = ErrorTemplate {
                title: "Error",
                message: &message,
            };
            return (status, Html(template.render().unwrap_or(message.clone()))).into_response();
        }
    };

    let rendered = match selection {
        Selection::Next(image) => {
            let image_url = image.url_path();
            NextLabelTemplate {
                username: &username,
                filename: &image.filename,
                image_url: &image_url,
                labels: &state.labels,
            }
            .render()
        }
        Selection::Exhausted => CompleteTemplate {
            username: &username,
        }
        .render(),
    };

    Html(rendered.unwrap_or_else(|e| format!("Template error: {}", e))).into_response()
}

/// JSON variant of the next-image lookup.
pub async fn api_next(State(state): State<AppState>, Path(username): Path<String>) -> Response {
    match state.labeling.next_for(&username).await {
        Ok((_, Selection::Next(image))) => Json(serde_json::json!({
            "status": "next",
            "image": {
                "id": image.id,
                "filename": image.filename,
                "url": image.url_path(),
            },
        }))
        .into_response(),
        Ok((_, Selection::Exhausted)) => {
            Json(serde_json::json!({ "status": "exhausted" })).into_response()
        }
        Err(e) => service_error_response(e),
    }
}
