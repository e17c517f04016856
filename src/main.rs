//! FinAid Hub backend server.

use anyhow::{Context, Result};
use axum::middleware;
use finaid_hub_backend::{
    auth::blacklist::now_ts,
    build_router,
    middleware::{rate_limit_middleware, RateLimitConfig, RateLimitLayer},
    AppState, Config,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::{net::TcpListener, time::interval};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let port = config.port;

    info!("FinAid Hub API starting (env: {:?})", config.environment);

    let state = AppState::new(config)?;

    // Blacklist entries outlive their usefulness once the token itself
    // expires; sweep them hourly.
    let blacklist = state.blacklist.clone();
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(3600));
        loop {
            ticker.tick().await;
            let removed = blacklist.sweep(now_ts());
            if removed > 0 {
                debug!("Blacklist sweep removed {} expired entries", removed);
            }
        }
    });

    let limiter = RateLimitLayer::new(RateLimitConfig::default());
    let cleanup_limiter = limiter.clone();
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(300));
        loop {
            ticker.tick().await;
            cleanup_limiter.cleanup();
        }
    });

    let app = build_router(state).layer(middleware::from_fn_with_state(
        limiter,
        rate_limit_middleware,
    ));

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finaid_hub_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
