//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use wakeshift_domain::error::{ValidationError, WakeShiftError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`WakeShiftError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(WakeShiftError);

impl From<WakeShiftError> for ApiError {
    fn from(err: WakeShiftError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            WakeShiftError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            WakeShiftError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            WakeShiftError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
            WakeShiftError::Unavailable(_) => {
                tracing::warn!(error = %self.0, "service unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string())
            }
            WakeShiftError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
