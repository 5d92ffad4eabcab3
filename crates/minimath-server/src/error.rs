use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use minimath_core::models::ErrorBody;
use minimath_core::StoreError;
use thiserror::Error;

/// Request-level error; every variant renders as `{"error": "..."}`
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid player name or score, or an unreadable request
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The progress store failed
    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Storage(err.to_string())
        }
    }
}

/// Convenience alias for handler results.
pub type Result<T> = std::result::Result<T, ApiError>;
