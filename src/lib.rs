//! FinAid Hub Backend Library
//!
//! Exposes core modules for use by the server binary and integration tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod response;
pub mod store;

pub use api::routes::{build_router, AppState};
pub use config::Config;
