//! Admin user management: list, create with a temporary password, delete
//! with a self-deletion guard.

use crate::api::clients::parse_id;
use crate::api::routes::AppState;
use crate::auth::models::{Claims, CreateUserRequest, UserView};
use crate::auth::store::new_account;
use crate::errors::ApiError;
use crate::response::ApiEnvelope;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::json;
use tracing::info;

pub async fn list_users(State(state): State<AppState>) -> Json<ApiEnvelope> {
    let mut accounts = state.users.all();
    accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let views: Vec<UserView> = accounts.iter().map(UserView::from_account).collect();
    ApiEnvelope::ok("Users retrieved", json!({ "users": views }))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let mut errors = Vec::new();
    if !payload.email.contains('@') {
        errors.push("email must be a valid email address".to_string());
    }
    if payload.first_name.trim().is_empty() {
        errors.push("first_name is required".to_string());
    }
    if payload.last_name.trim().is_empty() {
        errors.push("last_name is required".to_string());
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if state.users.find_by_email(&payload.email).is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    // The new user signs in with a one-time temporary password and is
    // expected to change it through the reset flow.
    let temporary_password = generate_temp_password();
    let account = new_account(
        payload.email.trim(),
        &temporary_password,
        payload.role,
        payload.first_name.trim(),
        payload.last_name.trim(),
        state.config.bcrypt_cost,
    )?;
    state.users.insert(account.clone())?;

    info!("User created: {} ({})", account.email, account.role.as_str());

    Ok(ApiEnvelope::ok(
        "User created",
        json!({
            "user": UserView::from_account(&account),
            "temporary_password": temporary_password,
        }),
    ))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let id = parse_id(&id)?;

    if id.to_string() == claims.sub {
        return Err(ApiError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    state
        .users
        .remove(&id)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!("User deleted: {}", id);

    Ok(ApiEnvelope::ok_empty("User deleted"))
}

fn generate_temp_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}
