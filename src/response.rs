//! Uniform API response envelope.
//!
//! Every route, success or failure, responds with
//! `{success, message, data, timestamp}` - the dashboard depends on this
//! shape.

use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ApiEnvelope {
    pub success: bool,
    pub message: String,
    pub data: Value,
    pub timestamp: String,
}

impl ApiEnvelope {
    pub fn ok(message: &str, data: impl Serialize) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            data: serde_json::to_value(data).unwrap_or(Value::Null),
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    pub fn ok_empty(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            data: Value::Null,
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    pub fn fail(message: &str, data: Value) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            data,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
