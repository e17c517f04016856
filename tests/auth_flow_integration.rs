//! End-to-end tests driving the composed router: login, token lifecycle,
//! role guards, password reset, and the CRUD surface.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use finaid_hub_backend::{build_router, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin123";

fn test_app() -> (Router, AppState) {
    let state = AppState::new(Config::for_tests()).expect("state should build");
    (build_router(state.clone()), state)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.expect("request should run");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn post_json_auth(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build")
}

fn delete_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build")
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json(
            "/api/v1/auth",
            json!({ "username": email, "password": password }),
        ),
    )
    .await
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn login_returns_token_and_sanitized_user() {
    let (app, _state) = test_app();

    let (status, body) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().unwrap().len() > 20);
    assert_eq!(body["data"]["user"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["user"]["role"], "admin");
    // The hash must never appear anywhere in the response
    assert!(!body.to_string().contains("password_hash"));

    // Envelope shape
    assert!(body["timestamp"].as_str().is_some());
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (app, _state) = test_app();

    let (wrong_pw_status, wrong_pw) = login(&app, ADMIN_EMAIL, "not-the-password").await;
    let (unknown_status, unknown) = login(&app, "nobody@example.com", "whatever").await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    // Identical generic message in both cases
    assert_eq!(wrong_pw["message"], unknown["message"]);
    assert_eq!(wrong_pw["success"], false);
}

#[tokio::test]
async fn token_round_trips_through_me_endpoint() {
    let (app, _state) = test_app();
    let token = admin_token(&app).await;

    let (status, body) = send(&app, get_auth("/api/v1/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["user_type"], "admin");
}

#[tokio::test]
async fn missing_and_garbage_tokens_are_rejected() {
    let (app, _state) = test_app();

    let req = Request::builder()
        .method("GET")
        .uri("/api/v1/auth/me")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A token that fails verification maps to 403, not 401
    let (status, _) = send(&app, get_auth("/api/v1/auth/me", "garbage.token.here")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_blacklists_token_permanently() {
    let (app, _state) = test_app();
    let token = admin_token(&app).await;

    let (status, _) = send(&app, get_auth("/api/v1/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);

    // Logout always succeeds
    let (status, body) = send(
        &app,
        post_json_auth("/api/v1/auth/logout", &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // The token is dead for good, despite its remaining validity window
    for _ in 0..2 {
        let (status, _) = send(&app, get_auth("/api/v1/auth/me", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // Logging out again with the same token is harmless
    let (status, _) = send(
        &app,
        post_json_auth("/api/v1/auth/logout", &token, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn logout_of_invalid_token_still_succeeds() {
    let (app, _state) = test_app();

    let (status, body) = send(
        &app,
        post_json_auth("/api/v1/auth/logout", "never.was.valid", json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn role_guard_enforces_allow_list() {
    let (app, _state) = test_app();
    let admin = admin_token(&app).await;

    // Admin provisions an accountant; the temporary password comes back
    // exactly once.
    let (status, body) = send(
        &app,
        post_json_auth(
            "/api/v1/users",
            &admin,
            json!({
                "email": "bea@example.com",
                "role": "accountant",
                "first_name": "Bea",
                "last_name": "Ledger",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let temp_password = body["data"]["temporary_password"].as_str().unwrap().to_string();

    let (status, body) = login(&app, "bea@example.com", &temp_password).await;
    assert_eq!(status, StatusCode::OK);
    let accountant = body["data"]["token"].as_str().unwrap().to_string();

    // Admin-only surface rejects the accountant
    let (status, body) = send(&app, get_auth("/api/v1/users", &accountant)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Insufficient permissions");

    // Staff surface lets the accountant through
    let (status, _) = send(&app, get_auth("/api/v1/clients", &accountant)).await;
    assert_eq!(status, StatusCode::OK);

    // And the admin passes the admin-only guard
    let (status, _) = send(&app, get_auth("/api/v1/users", &admin)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (app, _state) = test_app();
    let admin = admin_token(&app).await;

    let payload = json!({
        "email": "dup@example.com",
        "role": "client",
        "first_name": "Dee",
        "last_name": "Dupe",
    });

    let (status, _) = send(&app, post_json_auth("/api/v1/users", &admin, payload.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, post_json_auth("/api/v1/users", &admin, payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn admin_cannot_delete_own_account() {
    let (app, _state) = test_app();

    let (_, body) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let admin = body["data"]["token"].as_str().unwrap().to_string();
    let own_id = body["data"]["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, delete_auth(&format!("/api/v1/users/{own_id}"), &admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot delete your own account");

    // Deleting a different user works
    let (_, created) = send(
        &app,
        post_json_auth(
            "/api/v1/users",
            &admin,
            json!({
                "email": "temp@example.com",
                "role": "client",
                "first_name": "Tem",
                "last_name": "Porary",
            }),
        ),
    )
    .await;
    let other_id = created["data"]["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, delete_auth(&format!("/api/v1/users/{other_id}"), &admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    // A second delete of the same id is a 404
    let (status, _) = send(&app, delete_auth(&format!("/api/v1/users/{other_id}"), &admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn password_reset_flow() {
    let (app, state) = test_app();

    // Unknown email leaks existence by design: 404
    let (status, _) = send(
        &app,
        post_json("/api/v1/auth/reset", json!({ "email": "ghost@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        post_json("/api/v1/auth/reset", json!({ "email": ADMIN_EMAIL })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let otp = state.otps.peek(ADMIN_EMAIL).expect("OTP should be stored").code;
    let wrong_otp = if otp == "000000" { "111111" } else { "000000" };

    // Wrong OTP: 400, original password still works
    let (status, _) = send(
        &app,
        post_json(
            "/api/v1/auth/update-password",
            json!({
                "email": ADMIN_EMAIL,
                "otp": wrong_otp,
                "new_password": "new-password-1",
                "new_password_confirmation": "new-password-1",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);

    // Mismatched confirmation fails before the OTP is even consulted
    let (status, _) = send(
        &app,
        post_json(
            "/api/v1/auth/update-password",
            json!({
                "email": ADMIN_EMAIL,
                "otp": otp,
                "new_password": "new-password-1",
                "new_password_confirmation": "different",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Correct OTP: password changes, record is consumed
    let (status, _) = send(
        &app,
        post_json(
            "/api/v1/auth/update-password",
            json!({
                "email": ADMIN_EMAIL,
                "otp": otp,
                "new_password": "new-password-1",
                "new_password_confirmation": "new-password-1",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = login(&app, ADMIN_EMAIL, "new-password-1").await;
    assert_eq!(status, StatusCode::OK);

    // Replaying the consumed OTP fails
    let (status, _) = send(
        &app,
        post_json(
            "/api/v1/auth/update-password",
            json!({
                "email": ADMIN_EMAIL,
                "otp": otp,
                "new_password": "new-password-2",
                "new_password_confirmation": "new-password-2",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn client_and_license_crud() {
    let (app, _state) = test_app();
    let admin = admin_token(&app).await;

    // Validation failures come back as field-level messages
    let (status, body) = send(
        &app,
        post_json_auth(
            "/api/v1/clients",
            &admin,
            json!({ "name": "", "email": "not-an-email" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["data"]["errors"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        post_json_auth(
            "/api/v1/clients",
            &admin,
            json!({ "name": "Acme LLC", "email": "books@acme.test", "company": "Acme" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let client_id = body["data"]["id"].as_str().unwrap().to_string();

    // A license must reference an existing client
    let (status, _) = send(
        &app,
        post_json_auth(
            "/api/v1/licenses",
            &admin,
            json!({
                "client_id": uuid::Uuid::new_v4(),
                "plan": "pro",
                "seats": 5,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        post_json_auth(
            "/api/v1/licenses",
            &admin,
            json!({ "client_id": client_id, "plan": "pro", "seats": 5 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let license_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get_auth("/api/v1/licenses", &admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["licenses"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        delete_auth(&format!("/api/v1/licenses/{license_id}"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        get_auth(&format!("/api/v1/licenses/{license_id}"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_upsert_round_trip() {
    let (app, _state) = test_app();
    let admin = admin_token(&app).await;

    let (status, body) = send(&app, get_auth("/api/v1/profiles/me", &admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let req = Request::builder()
        .method("PUT")
        .uri("/api/v1/profiles/me")
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {admin}"))
        .body(Body::from(
            json!({ "phone": "+1 555 0100", "timezone": "America/New_York" }).to_string(),
        ))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get_auth("/api/v1/profiles/me", &admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone"], "+1 555 0100");
}

#[tokio::test]
async fn integration_stubs_serve_canned_payloads() {
    let (app, _state) = test_app();
    let admin = admin_token(&app).await;

    let (status, body) = send(
        &app,
        get_auth("/api/v1/integrations/quickbooks/company", &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["CompanyInfo"]["CompanyName"].as_str().is_some());

    let (status, body) = send(
        &app,
        get_auth("/api/v1/integrations/predictions/forecast", &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["forecast"].as_array().is_some());
}

#[tokio::test]
async fn health_check_is_public() {
    let (app, _state) = test_app();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
