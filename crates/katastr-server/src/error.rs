//! Mapping of handler failures to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use katastr_cache::ResolveError;
use katastr_cuzk::CuzkError;
use thiserror::Error;

/// Handler error, rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request parameters
    #[error("{0}")]
    BadRequest(&'static str),

    #[error(transparent)]
    Upstream(CuzkError),

    #[error("serialize response: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CuzkError> for ApiError {
    fn from(error: CuzkError) -> Self {
        if error.is_cancelled() {
            ApiError::Cancelled
        } else {
            ApiError::Upstream(error)
        }
    }
}

impl From<ResolveError<CuzkError>> for ApiError {
    fn from(error: ResolveError<CuzkError>) -> Self {
        match error {
            ResolveError::Fetch(e) => e.into(),
            ResolveError::Serialize(e) => ApiError::Serialize(e),
            ResolveError::Cancelled => ApiError::Cancelled,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::BadRequest(msg) => tracing::debug!("Bad request: {}", msg),
            ApiError::Cancelled => tracing::debug!("Request cancelled"),
            other => tracing::error!("Request failed: {}", other),
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
