//! AI-prediction service proxy. Same pattern as the QuickBooks proxy:
//! forward when configured, canned payload otherwise.

use crate::api::routes::AppState;
use crate::errors::ApiError;
use crate::integrations::proxy_get;
use crate::response::ApiEnvelope;
use axum::{extract::State, Json};
use serde_json::json;

pub async fn cashflow_forecast(
    State(state): State<AppState>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let data = match &state.config.predictions_base_url {
        Some(base) => proxy_get(&state.http, base, "v1/forecast/cashflow").await?,
        None => json!({
            "forecast": [
                { "month": "2025-10", "inflow": 42000.0, "outflow": 37500.0, "confidence": 0.82 },
                { "month": "2025-11", "inflow": 44500.0, "outflow": 39100.0, "confidence": 0.77 },
                { "month": "2025-12", "inflow": 51000.0, "outflow": 46800.0, "confidence": 0.71 },
            ],
            "model_version": "placeholder",
        }),
    };

    Ok(ApiEnvelope::ok("Forecast retrieved", data))
}
