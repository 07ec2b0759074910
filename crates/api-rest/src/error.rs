//! Mapping of handler outcomes onto HTTP responses.
//!
//! | Variant | Status | Body |
//! |---|---|---|
//! | `BadRequest` | 400 | `{"error": <message>}` |
//! | `NotFound` | 404 | empty |
//! | `Internal` | 500 | `{"error": "Internal error"}` |
//!
//! Internal errors are logged with their operation and cause, but clients only ever see the
//! opaque message.

use ambulance_core::PatientError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

/// Error payload returned with 400 and 500 responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    #[schema(example = "Name and condition are required")]
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("{operation} failed: {source}")]
    Internal {
        operation: &'static str,
        #[source]
        source: PatientError,
    },
}

impl ApiError {
    /// Returns a closure classifying a persistence failure raised while performing `operation`.
    pub fn persistence(operation: &'static str) -> impl FnOnce(PatientError) -> Self {
        move |source| {
            if source.is_client_error() {
                ApiError::from(source)
            } else {
                ApiError::Internal { operation, source }
            }
        }
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::InvalidInput(message) => ApiError::BadRequest(message),
            other => ApiError::Internal {
                operation: "handle request",
                source: other,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(error) => {
                tracing::debug!(%error, "rejecting request");
                (StatusCode::BAD_REQUEST, Json(ErrorRes { error })).into_response()
            }
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Internal { operation, source } => {
                tracing::error!("{} error: {:?}", operation, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorRes {
                        error: INTERNAL_ERROR_MESSAGE.into(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
