//! Authentication endpoints: login, logout, password reset, claims echo.

use crate::api::routes::AppState;
use crate::auth::{
    middleware::bearer_token,
    models::{Claims, LoginRequest, ResetRequest, UpdatePasswordRequest, UserView},
    otp::OtpCheck,
};
use crate::errors::ApiError;
use crate::response::ApiEnvelope;
use axum::{extract::State, http::HeaderMap, Extension, Json};
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Login - POST /api/v1/auth
///
/// Unknown email and wrong password produce the same generic failure so
/// the response does not reveal which check failed.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    info!("Login attempt: {}", payload.username);

    let account = state
        .users
        .find_by_email(&payload.username)
        .ok_or(ApiError::Unauthenticated(INVALID_CREDENTIALS))?;

    let valid = bcrypt::verify(&payload.password, &account.password_hash)
        .map_err(|e| ApiError::Internal(e.into()))?;
    if !valid {
        warn!("Failed login attempt: {}", payload.username);
        return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS));
    }

    let (token, _expires_at) = state.codec.issue(&account)?;

    info!("Login successful: {} ({})", account.email, account.role.as_str());

    Ok(ApiEnvelope::ok(
        "Login successful",
        json!({
            "token": token,
            "user": UserView::from_account(&account),
        }),
    ))
}

/// Logout - POST /api/v1/auth/logout
///
/// Blacklists the bearer token unconditionally; revoking an already
/// invalid token is harmless, and logout never fails from the caller's
/// perspective.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<ApiEnvelope> {
    if let Some(token) = bearer_token(&headers) {
        // Keep the entry only as long as the token itself could live: use
        // its real expiry when it verifies, a synthetic one otherwise.
        let expires_at = state
            .codec
            .verify(token)
            .map(|c| c.exp as i64)
            .unwrap_or_else(|| Utc::now().timestamp() + state.config.token_ttl_hours * 3600);
        state.blacklist.revoke(token, expires_at);
    }

    ApiEnvelope::ok_empty("Logged out")
}

/// Request a password reset - POST /api/v1/auth/reset
///
/// A 404 for unknown emails leaks account existence; that tradeoff is part
/// of the documented contract, not something to silently change.
pub async fn request_reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    let account = state
        .users
        .find_by_email(&payload.email)
        .ok_or_else(|| ApiError::NotFound("No account found for that email".to_string()))?;

    let code = state.otps.issue(&account.email);

    // Mail transport is an external collaborator; a log line stands in.
    info!("Password reset OTP for {}: {}", account.email, code);

    Ok(ApiEnvelope::ok_empty("OTP sent"))
}

/// Complete a password reset - POST /api/v1/auth/update-password
pub async fn update_password(
    State(state): State<AppState>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<ApiEnvelope>, ApiError> {
    // Fail fast on the cheap check before touching the OTP store.
    if payload.new_password != payload.new_password_confirmation {
        return Err(ApiError::BadRequest(
            "Password confirmation does not match".to_string(),
        ));
    }
    if payload.new_password.len() < 8 {
        return Err(ApiError::Validation(vec![
            "new_password must be at least 8 characters".to_string(),
        ]));
    }

    match state
        .otps
        .verify(&payload.email, &payload.otp, Utc::now().timestamp())
    {
        OtpCheck::Missing => {
            return Err(ApiError::BadRequest("No active OTP for that email".to_string()))
        }
        OtpCheck::Mismatch => return Err(ApiError::BadRequest("Incorrect OTP".to_string())),
        OtpCheck::Expired => return Err(ApiError::BadRequest("OTP has expired".to_string())),
        OtpCheck::Valid => {}
    }

    let mut account = state
        .users
        .find_by_email(&payload.email)
        .ok_or_else(|| ApiError::NotFound("No account found for that email".to_string()))?;

    account.password_hash = bcrypt::hash(&payload.new_password, state.config.bcrypt_cost)
        .map_err(|e| ApiError::Internal(e.into()))?;
    account.updated_at = Utc::now().to_rfc3339();
    state.users.update(account)?;

    state.otps.consume(&payload.email);

    info!("Password updated for {}", payload.email);

    Ok(ApiEnvelope::ok_empty("Password updated"))
}

/// Claims echo - GET /api/v1/auth/me
///
/// Built purely from the verified token, no store lookup.
pub async fn me(Extension(claims): Extension<Claims>) -> Json<ApiEnvelope> {
    ApiEnvelope::ok(
        "Authenticated",
        json!({
            "userId": claims.sub,
            "email": claims.email,
            "user_type": claims.user_type,
            "first_name": claims.first_name,
            "last_name": claims.last_name,
        }),
    )
}
