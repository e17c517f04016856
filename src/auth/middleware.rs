//! Request gate and role guard.
//!
//! `auth_middleware` runs once per request: extract bearer token, reject
//! blacklisted tokens, verify signature/expiry, attach the decoded claims
//! to the request extensions. `role_guard` composes after it with a
//! per-route allow-list fixed at registration time.

use crate::api::routes::AppState;
use crate::auth::models::{Claims, Role};
use crate::errors::ApiError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .ok_or(ApiError::Unauthenticated("Authentication required"))?;

    // Blacklist check comes first: a revoked token is rejected even while
    // its signature and expiry are still valid.
    if state.blacklist.is_revoked(token) {
        return Err(ApiError::Unauthenticated("Token has been revoked"));
    }

    let claims = state.codec.verify(token).ok_or(ApiError::InvalidToken)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Allow-list for a group of routes, configured once at registration.
#[derive(Clone)]
pub struct RoleGuard {
    allowed: Vec<Role>,
}

pub fn require_roles(allowed: &[Role]) -> RoleGuard {
    RoleGuard {
        allowed: allowed.to_vec(),
    }
}

pub async fn role_guard(
    State(guard): State<RoleGuard>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Runs after auth_middleware; missing claims means the chain was
    // miswired or the route was hit unauthenticated.
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(ApiError::Unauthenticated("Authentication required"))?;

    if !guard.allowed.contains(&claims.user_type) {
        return Err(ApiError::Forbidden("Insufficient permissions"));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert("Authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert!(bearer_token(&headers).is_none());

        headers.insert("Authorization", HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_none());
    }

    #[test]
    fn test_role_guard_allow_list() {
        let guard = require_roles(&[Role::Admin, Role::SuperAdmin]);
        assert!(guard.allowed.contains(&Role::Admin));
        assert!(!guard.allowed.contains(&Role::Accountant));
    }
}
