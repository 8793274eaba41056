//! API error handling.

use augur_core::AugurError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: msg.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

impl From<AugurError> for ApiError {
    fn from(err: AugurError) -> Self {
        match &err {
            AugurError::ModelNotFound(_) | AugurError::LabelsNotFound(_) => {
                ApiError::not_found(err.to_string())
            }
            AugurError::UnsupportedFileType { .. } | AugurError::Preprocessing(_) => {
                ApiError::bad_request(err.to_string())
            }
            // Server-side conditions: full detail stays in the logs, the
            // caller gets an opaque failure.
            AugurError::ShapeMismatch { .. }
            | AugurError::MalformedLabels { .. }
            | AugurError::Internal(_) => {
                tracing::error!("prediction failed: {err}");
                ApiError::internal()
            }
        }
    }
}
