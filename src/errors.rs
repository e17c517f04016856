//! API error taxonomy.
//!
//! Handlers translate their own domain failures into `ApiError`; anything
//! truly unexpected is caught by the panic layer in `middleware`. Nothing
//! is retried - failures surface to the caller immediately.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::error;

use crate::response::ApiEnvelope;

#[derive(Debug)]
pub enum ApiError {
    /// Missing or revoked credentials (401).
    Unauthenticated(&'static str),
    /// Token present but failed signature/expiry verification (403).
    InvalidToken,
    /// Valid token, insufficient role (403).
    Forbidden(&'static str),
    /// Entity lookup miss (404).
    NotFound(String),
    /// Duplicate unique field on creation (400).
    Conflict(String),
    /// Schema violation on input (400, with field-level messages).
    Validation(Vec<String>),
    /// Malformed input that isn't a field-level issue (400).
    BadRequest(String),
    /// Third-party integration failure (502).
    Upstream(String),
    /// Unexpected failure (500); detail stays server-side.
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, data) = match self {
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.to_string(), Value::Null),
            ApiError::InvalidToken => (
                StatusCode::FORBIDDEN,
                "Invalid or expired token".to_string(),
                Value::Null,
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.to_string(), Value::Null),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Value::Null),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg, Value::Null),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                json!({ "errors": errors }),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Value::Null),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg, Value::Null),
            ApiError::Internal(err) => {
                error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Value::Null,
                )
            }
        };

        (status, Json(ApiEnvelope::fail(&message, data))).into_response()
    }
}
