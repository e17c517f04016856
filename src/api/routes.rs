//! Shared application state and router assembly.

use crate::api::clients::ClientRecord;
use crate::api::licenses::LicenseRecord;
use crate::api::profiles::Profile;
use crate::api::{clients, licenses, profiles, users};
use crate::auth::models::Role;
use crate::auth::{
    api as auth_api, auth_middleware, require_roles, role_guard, seed_bootstrap_admin,
    CredentialStore, MemoryCredentialStore, OtpStore, TokenBlacklist, TokenCodec,
};
use crate::config::Config;
use crate::integrations;
use crate::middleware::{logging::request_logging, panic_response};
use crate::response::ApiEnvelope;
use crate::store::MemTable;
use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn CredentialStore>,
    pub codec: Arc<TokenCodec>,
    pub blacklist: Arc<TokenBlacklist>,
    pub otps: Arc<OtpStore>,
    pub clients: Arc<MemTable<ClientRecord>>,
    pub licenses: Arc<MemTable<LicenseRecord>>,
    pub profiles: Arc<MemTable<Profile>>,
    pub http: reqwest::Client,
}

impl AppState {
    /// Build the full state from configuration and seed the bootstrap
    /// admin.
    pub fn new(config: Config) -> Result<Self> {
        let users: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        seed_bootstrap_admin(users.as_ref(), &config)?;

        let codec = Arc::new(TokenCodec::new(
            config.jwt_secret.clone(),
            config.token_ttl_hours,
        ));
        let otps = Arc::new(OtpStore::new(config.otp_ttl_minutes));

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            config: Arc::new(config),
            users,
            codec,
            blacklist: Arc::new(TokenBlacklist::new()),
            otps,
            clients: Arc::new(MemTable::new()),
            licenses: Arc::new(MemTable::new()),
            profiles: Arc::new(MemTable::new()),
            http,
        })
    }
}

const ADMIN_ROLES: &[Role] = &[Role::Admin, Role::SuperAdmin];
const STAFF_ROLES: &[Role] = &[
    Role::Admin,
    Role::SuperAdmin,
    Role::Accountant,
    Role::AccountingFirmOwner,
];

/// Compose the API router. Guard layers are fixed per route group at
/// registration time; `auth_middleware` wraps every protected group.
pub fn build_router(state: AppState) -> Router {
    // Public surface: login, reset flow, logout (logout of an invalid
    // token is harmless, so it needs no gate), health.
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/auth", post(auth_api::login))
        .route("/api/v1/auth/logout", post(auth_api::logout))
        .route("/api/v1/auth/reset", post(auth_api::request_reset))
        .route("/api/v1/auth/update-password", post(auth_api::update_password));

    let admin_routes = Router::new()
        .route("/api/v1/users", get(users::list_users).post(users::create_user))
        .route("/api/v1/users/:id", delete(users::delete_user))
        .route_layer(middleware::from_fn_with_state(
            require_roles(ADMIN_ROLES),
            role_guard,
        ));

    let staff_routes = Router::new()
        .route(
            "/api/v1/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/api/v1/clients/:id",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route(
            "/api/v1/licenses",
            get(licenses::list_licenses).post(licenses::create_license),
        )
        .route(
            "/api/v1/licenses/:id",
            get(licenses::get_license)
                .put(licenses::update_license)
                .delete(licenses::delete_license),
        )
        .route(
            "/api/v1/integrations/quickbooks/company",
            get(integrations::quickbooks::company_info),
        )
        .route(
            "/api/v1/integrations/quickbooks/accounts",
            get(integrations::quickbooks::chart_of_accounts),
        )
        .route(
            "/api/v1/integrations/predictions/forecast",
            get(integrations::predictions::cashflow_forecast),
        )
        .route_layer(middleware::from_fn_with_state(
            require_roles(STAFF_ROLES),
            role_guard,
        ));

    // Any authenticated role.
    let user_routes = Router::new()
        .route("/api/v1/auth/me", get(auth_api::me))
        .route(
            "/api/v1/profiles/me",
            get(profiles::get_my_profile).put(profiles::update_my_profile),
        );

    let protected_routes = Router::new()
        .merge(admin_routes)
        .merge(staff_routes)
        .merge(user_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

async fn health_check() -> Json<ApiEnvelope> {
    ApiEnvelope::ok(
        "FinAid Hub API operational",
        json!({ "version": env!("CARGO_PKG_VERSION") }),
    )
}
