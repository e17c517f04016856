//! Authentication: token codec, blacklist, credential storage, OTP reset
//! flow, and the request gate / role guard middleware.

pub mod api;
pub mod blacklist;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod otp;
pub mod store;

pub use blacklist::TokenBlacklist;
pub use jwt::TokenCodec;
pub use middleware::{auth_middleware, require_roles, role_guard};
pub use otp::OtpStore;
pub use store::{seed_bootstrap_admin, CredentialStore, MemoryCredentialStore};
