//! HTTP middleware: request logging, per-IP rate limiting, and the
//! last-resort panic handler.

pub mod logging;
pub mod rate_limit;

use crate::response::ApiEnvelope;
use axum::{body::Body, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::Value;
use std::any::Any;
use tracing::error;

pub use rate_limit::{rate_limit_middleware, RateLimitConfig, RateLimitLayer};

/// Render a panic as a 500 envelope instead of dropping the connection.
/// The process must always respond; panic detail stays server-side.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiEnvelope::fail("Internal server error", Value::Null)),
    )
        .into_response()
}
