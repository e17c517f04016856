//! License CRUD. A license always references an existing client.

use crate::api::clients::parse_id;
use crate::api::routes::AppState;
use crate::errors::ApiError;
use crate::response::ApiEnvelope;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct LicenseRecord {
    pub id: Uuid,
    pub client_id: Uuid,
    pub plan: String,
    pub seats: u32,
    pub status: String,
    pub expires_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct LicensePayload {
    pub client_id: Uuid,
    pub plan: String,
    pub seats: u32,
    pub expires_at: Option<String>,
}

fn validate(payload: &LicensePayload) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if payload.plan.trim().is_empty() {
        errors.push("plan is required".to_string());
    }
    if payload.seats == 0 {
        errors.push("seats must be at least 1".to_string());
    }
    if let Some(expires_at) = &payload.expires_at {
        if chrono::DateTime::parse_from_rfc3339(expires_at).is_err() {
            errors.push("expires_at must be an RFC 3339 timestamp".to_string());
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

pub async fn list_licenses(State(state): State<AppState>) -> Json<ApiEnvelope> {
    let mut licenses = state.licenses.values();
    licenses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    ApiEnvelope::ok("Licenses retrieved", json!({ "licenses": licenses }))
}

pub async fn get_license(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let id = parse_id(&id)?;
    let license = state
        .licenses
        .get(&id)
        .ok_or_else(|| ApiError::NotFound("License not found".to_string()))?;
    Ok(ApiEnvelope::ok("License retrieved", license))
}

pub async fn create_license(
    State(state): State<AppState>,
    Json(payload): Json<LicensePayload>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    validate(&payload)?;

    if !state.clients.contains(&payload.client_id) {
        return Err(ApiError::NotFound("Client not found".to_string()));
    }

    let now = Utc::now().to_rfc3339();
    let license = LicenseRecord {
        id: Uuid::new_v4(),
        client_id: payload.client_id,
        plan: payload.plan.trim().to_string(),
        seats: payload.seats,
        status: "active".to_string(),
        expires_at: payload.expires_at,
        created_at: now.clone(),
        updated_at: now,
    };
    state.licenses.set(license.id, license.clone());

    Ok(ApiEnvelope::ok("License created", license))
}

pub async fn update_license(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<LicensePayload>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let id = parse_id(&id)?;
    validate(&payload)?;

    if !state.clients.contains(&payload.client_id) {
        return Err(ApiError::NotFound("Client not found".to_string()));
    }

    let mut license = state
        .licenses
        .get(&id)
        .ok_or_else(|| ApiError::NotFound("License not found".to_string()))?;

    license.client_id = payload.client_id;
    license.plan = payload.plan.trim().to_string();
    license.seats = payload.seats;
    license.expires_at = payload.expires_at;
    license.updated_at = Utc::now().to_rfc3339();
    state.licenses.set(id, license.clone());

    Ok(ApiEnvelope::ok("License updated", license))
}

pub async fn delete_license(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let id = parse_id(&id)?;
    state
        .licenses
        .delete(&id)
        .ok_or_else(|| ApiError::NotFound("License not found".to_string()))?;
    Ok(ApiEnvelope::ok_empty("License deleted"))
}
