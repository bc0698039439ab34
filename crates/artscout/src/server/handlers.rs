//! Route handlers.

use super::error::ApiError;
use super::AppState;
use artscout_core::{ImageBuffer, SearchResponse};
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

/// `POST /api/search`: run the pipeline on the uploaded image.
///
/// # Returns
/// - 200 with the search response
/// - 400 if the `image` field is missing, empty or the body isn't multipart
/// - 413 if the image exceeds the upload limit
/// - 500 if any pipeline stage fails
pub async fn search(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!("Rejected search request: {e}");
        ApiError::NoImage
    })?;

    let image = read_image_field(&mut multipart).await?;

    // Run detached so a client disconnect doesn't abort in-flight provider calls
    let orchestrator = state.orchestrator.clone();
    let outcome = tokio::spawn(async move { orchestrator.run(image).await })
        .await
        .map_err(|e| {
            tracing::error!("Search task failed: {e}");
            ApiError::Internal(e.to_string())
        })??;

    Ok(Json(SearchResponse::from(outcome)))
}

/// `GET /api/health`: liveness check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": artscout_core::VERSION,
    }))
}

async fn read_image_field(multipart: &mut Multipart) -> Result<ImageBuffer, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(ApiError::NoImage),
            Err(e) => return Err(read_failure(e)),
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(String::from);
        let bytes = field.bytes().await.map_err(read_failure)?;
        if bytes.is_empty() {
            return Err(ApiError::NoImage);
        }

        let image = ImageBuffer::new(bytes.to_vec());
        return Ok(match file_name {
            Some(name) => image.with_file_name(name),
            None => image,
        });
    }
}

/// An over-limit body is a real upload that was too big, not a missing image.
fn read_failure(err: MultipartError) -> ApiError {
    tracing::warn!("Failed to read multipart body: {err}");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge
    } else {
        ApiError::NoImage
    }
}
