//! API error type shared by all handlers.
//!
//! Every handler returns `Result<Json<T>, ApiError>`; the `IntoResponse`
//! impl maps each variant to an HTTP status plus a small JSON body
//! (`{"error": "..."}`), so error payloads stay uniform across endpoints.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed caller input (negative counts, out-of-range day, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Requested concept/exercise does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The completion store could not be read while building recommendations.
    /// Callers treat this as non-fatal and may render an empty suggestion set.
    #[error("recommendations unavailable: {0}")]
    RecommendationUnavailable(String),

    /// The completion store could not be read or written.
    #[error("completion store unavailable: {0}")]
    StoreUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RecommendationUnavailable(_) | ApiError::StoreUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
