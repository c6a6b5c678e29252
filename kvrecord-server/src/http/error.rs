//! API error types with IntoResponse
//!
//! Two body shapes exist. Key-value and diagnostic routes answer
//! `{"status": "error", "message": ...}` through `ApiError`; record routes
//! answer `{"error": ...}` through `RecordApiError`. Status codes are the same
//! for both.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { message: String },

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::NotFound { message } => message.clone(),
            Self::Database(e) => format!("Database error: {}", e),
            Self::Internal { message } => message.clone(),
        }
    }

    fn log_server_side(&self) {
        match self {
            Self::Database(e) => tracing::error!("Database error: {}", e),
            Self::Internal { message } => tracing::error!("Internal error: {}", message),
            Self::Validation(_) | Self::NotFound { .. } => {}
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_server_side();
        let body = json!({
            "status": "error",
            "message": self.message()
        });

        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(ValidationError::Malformed(rejection.body_text()))
    }
}

/// Error for record routes, rendered as `{"error": ...}`
#[derive(Debug)]
pub struct RecordApiError(pub ApiError);

impl IntoResponse for RecordApiError {
    fn into_response(self) -> Response {
        self.0.log_server_side();
        let body = json!({ "error": self.0.message() });
        (self.0.status(), Json(body)).into_response()
    }
}

impl From<QueryRejection> for RecordApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ApiError::Validation(ValidationError::Malformed(
            rejection.body_text(),
        )))
    }
}

impl From<ValidationError> for RecordApiError {
    fn from(e: ValidationError) -> Self {
        Self(ApiError::Validation(e))
    }
}

impl From<DbError> for RecordApiError {
    fn from(e: DbError) -> Self {
        Self(ApiError::Database(e))
    }
}
