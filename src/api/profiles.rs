//! Per-user profile. Keyed by the authenticated user's id, so any signed-in
//! role can read and update its own profile.

use crate::api::routes::AppState;
use crate::auth::models::Claims;
use crate::errors::ApiError;
use crate::response::ApiEnvelope;
use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub timezone: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfilePayload {
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub timezone: Option<String>,
}

fn claims_user_id(claims: &Claims) -> Result<Uuid, ApiError> {
    Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Internal(anyhow::anyhow!("Malformed user id in claims")))
}

pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let user_id = claims_user_id(&claims)?;
    match state.profiles.get(&user_id) {
        Some(profile) => Ok(ApiEnvelope::ok("Profile retrieved", profile)),
        None => Ok(ApiEnvelope::ok("No profile set", Value::Null)),
    }
}

pub async fn update_my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let user_id = claims_user_id(&claims)?;

    let profile = Profile {
        user_id,
        phone: payload.phone,
        company: payload.company,
        address: payload.address,
        timezone: payload.timezone,
        updated_at: Utc::now().to_rfc3339(),
    };
    state.profiles.set(user_id, profile.clone());

    Ok(ApiEnvelope::ok("Profile updated", profile))
}
