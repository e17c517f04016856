//! Third-party integration proxies.

pub mod predictions;
pub mod quickbooks;

use crate::errors::ApiError;
use serde_json::Value;

/// Fetch JSON from an upstream integration. Any transport or decode
/// failure surfaces as a 502 - integrations are never retried here.
pub(crate) async fn proxy_get(
    http: &reqwest::Client,
    base: &str,
    path: &str,
) -> Result<Value, ApiError> {
    let url = format!("{}/{}", base.trim_end_matches('/'), path);

    let resp = http
        .get(&url)
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("Upstream request failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "Upstream returned {}",
            resp.status()
        )));
    }

    resp.json::<Value>()
        .await
        .map_err(|e| ApiError::Upstream(format!("Upstream returned invalid JSON: {e}")))
}
