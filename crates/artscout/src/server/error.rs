//! HTTP error mapping.

use artscout_core::{ErrorResponse, PipelineError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Errors a route handler can return.
#[derive(Debug)]
pub enum ApiError {
    /// The multipart body had no usable `image` field
    NoImage,
    /// The image exceeded the upload limit
    TooLarge,
    /// A pipeline stage failed
    Pipeline(PipelineError),
    /// The pipeline task itself died
    Internal(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NoImage => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::message(ErrorResponse::NO_IMAGE),
            ),
            ApiError::TooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse::message(ErrorResponse::IMAGE_TOO_LARGE),
            ),
            ApiError::Pipeline(err) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::from(&err)),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: ErrorResponse::SEARCH_FAILED.to_string(),
                    details: Some(serde_json::Value::String(msg)),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
