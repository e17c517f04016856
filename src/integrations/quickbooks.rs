//! QuickBooks proxy.
//!
//! With `QUICKBOOKS_BASE_URL` configured, requests are forwarded through
//! the shared HTTP client and the upstream JSON is wrapped in the
//! envelope. Unconfigured, the endpoints serve the canned placeholder
//! payloads the dashboard was built against.

use crate::api::routes::AppState;
use crate::errors::ApiError;
use crate::integrations::proxy_get;
use crate::response::ApiEnvelope;
use axum::{extract::State, Json};
use serde_json::json;

pub async fn company_info(
    State(state): State<AppState>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let data = match &state.config.quickbooks_base_url {
        Some(base) => proxy_get(&state.http, base, "v3/companyinfo").await?,
        None => json!({
            "CompanyInfo": {
                "CompanyName": "Sample Accounting Co",
                "LegalName": "Sample Accounting Co LLC",
                "Country": "US",
                "FiscalYearStartMonth": "January",
                "SupportedLanguages": "en",
            }
        }),
    };

    Ok(ApiEnvelope::ok("Company info retrieved", data))
}

pub async fn chart_of_accounts(
    State(state): State<AppState>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let data = match &state.config.quickbooks_base_url {
        Some(base) => proxy_get(&state.http, base, "v3/accounts").await?,
        None => json!({
            "Accounts": [
                { "Id": "1", "Name": "Checking", "AccountType": "Bank", "CurrentBalance": 1350.55 },
                { "Id": "33", "Name": "Accounts Receivable", "AccountType": "Accounts Receivable", "CurrentBalance": 5281.52 },
                { "Id": "60", "Name": "Payroll Expenses", "AccountType": "Expense", "CurrentBalance": 0.0 },
            ]
        }),
    };

    Ok(ApiEnvelope::ok("Accounts retrieved", data))
}
