//! Image file serving.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::super::AppState;

fn not_available(filename: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("Image {} not available", filename),
    )
        .into_response()
}

/// Serve an image from the image directory.
///
/// Only plain filenames directly inside the image directory are served.
pub async fn serve_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
    {
        return not_available(&filename);
    }

    let canonical_image_dir = match state.image_dir.canonicalize() {
        Ok(p) => p,
        Err(_) => return not_available(&filename),
    };

    let canonical_file = match canonical_image_dir.join(&filename).canonicalize() {
        Ok(p) => p,
        Err(_) => return not_available(&filename),
    };

    if !canonical_file.starts_with(&canonical_image_dir) || !canonical_file.is_file() {
        return not_available(&filename);
    }

    let content = match tokio::fs::read(&canonical_file).await {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", canonical_file.display(), e);
            return not_available(&filename);
        }
    };

    let mime = mime_guess::from_path(&canonical_file)
        .first_or_octet_stream()
        .to_string();

    ([(header::CONTENT_TYPE, mime)], content).into_response()
}
