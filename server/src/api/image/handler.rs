//! Image serving handler

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use shared::error::AppError;

use crate::core::ServerState;

/// GET /api/image/:filename - serve a stored menu image
///
/// Filenames are single path segments; anything that could climb out
/// of the images directory is rejected outright.
pub async fn serve(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(AppError::validation("Invalid filename"));
    }

    let path = state.images_dir().join(&filename);
    let data = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::not_found(format!("Image {}", filename)))?;

    let mime = mime_guess::from_path(&filename)
        .first_or_octet_stream()
        .to_string();

    Ok((
        [
            (header::CONTENT_TYPE, mime),
            (
                header::CACHE_CONTROL,
                "public, max-age=86400".to_string(),
            ),
        ],
        data,
    )
        .into_response())
}
