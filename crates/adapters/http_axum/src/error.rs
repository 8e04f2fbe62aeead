//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use subtrack_domain::error::{SubtrackError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SubtrackError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(SubtrackError);

impl From<SubtrackError> for ApiError {
    fn from(err: SubtrackError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::MalformedBody(rejection.body_text()).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ValidationError::MalformedBody(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SubtrackError::Validation(_) => StatusCode::BAD_REQUEST,
            SubtrackError::Conflict(_) => StatusCode::CONFLICT,
            SubtrackError::NotFound(_) => StatusCode::NOT_FOUND,
            SubtrackError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                let body = ErrorBody {
                    error: "internal server error".to_string(),
                };
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        tracing::warn!(status = status.as_u16(), error = %self.0, "request rejected");
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
