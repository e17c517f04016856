//! Application configuration loaded from the environment.

use anyhow::{bail, Result};
use tracing::warn;

const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";
const DEV_ADMIN_EMAIL: &str = "admin@example.com";
const DEV_ADMIN_PASSWORD: &str = "admin123";

/// Deployment environment. Anything other than "development" is treated as
/// production for the purposes of secret handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub otp_ttl_minutes: i64,
    pub admin_email: String,
    pub admin_password: String,
    pub quickbooks_base_url: Option<String>,
    pub predictions_base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let environment = Environment::from_str(
            &std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        // The signing secret must be known only to the server. A silent
        // fallback is acceptable in development, never in production.
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ if environment.is_development() => {
                warn!("JWT_SECRET not set - using built-in development secret");
                DEV_JWT_SECRET.to_string()
            }
            _ => bail!("JWT_SECRET must be set when APP_ENV is not development"),
        };

        let token_ttl_hours = std::env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(24);

        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&v| (4..=31).contains(&v))
            .unwrap_or(12);

        let otp_ttl_minutes = std::env::var("OTP_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(10);

        let admin_email = match std::env::var("ADMIN_EMAIL") {
            Ok(v) if !v.trim().is_empty() => v,
            _ if environment.is_development() => DEV_ADMIN_EMAIL.to_string(),
            _ => bail!("ADMIN_EMAIL must be set when APP_ENV is not development"),
        };

        let admin_password = match std::env::var("ADMIN_PASSWORD") {
            Ok(v) if !v.trim().is_empty() => v,
            _ if environment.is_development() => {
                warn!("ADMIN_PASSWORD not set - using built-in development password");
                DEV_ADMIN_PASSWORD.to_string()
            }
            _ => bail!("ADMIN_PASSWORD must be set when APP_ENV is not development"),
        };

        let quickbooks_base_url = std::env::var("QUICKBOOKS_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let predictions_base_url = std::env::var("PREDICTIONS_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            port,
            environment,
            jwt_secret,
            token_ttl_hours,
            bcrypt_cost,
            otp_ttl_minutes,
            admin_email,
            admin_password,
            quickbooks_base_url,
            predictions_base_url,
        })
    }

    /// Configuration for unit and integration tests. Uses a low bcrypt cost
    /// so hashing does not dominate test runtime.
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            environment: Environment::Development,
            jwt_secret: "test-secret-key-12345".to_string(),
            token_ttl_hours: 24,
            bcrypt_cost: 4,
            otp_ttl_minutes: 10,
            admin_email: DEV_ADMIN_EMAIL.to_string(),
            admin_password: DEV_ADMIN_PASSWORD.to_string(),
            quickbooks_base_url: None,
            predictions_base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("dev"), Environment::Development);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("staging"), Environment::Production);
    }

    // Env vars are process-global, so every from_env branch runs serially
    // inside this one test.
    #[test]
    fn test_from_env_secret_and_admin_handling() {
        std::env::set_var("APP_ENV", "production");
        std::env::remove_var("JWT_SECRET");
        std::env::remove_var("ADMIN_EMAIL");
        std::env::remove_var("ADMIN_PASSWORD");
        assert!(Config::from_env().is_err(), "production requires JWT_SECRET");

        std::env::set_var("JWT_SECRET", "prod-secret-0123456789abcdef0123456789");
        assert!(Config::from_env().is_err(), "production requires ADMIN_EMAIL");

        std::env::set_var("ADMIN_EMAIL", "ops@example.com");
        assert!(Config::from_env().is_err(), "production requires ADMIN_PASSWORD");

        std::env::set_var("ADMIN_PASSWORD", "not-a-default");
        let config = Config::from_env().unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.jwt_secret, "prod-secret-0123456789abcdef0123456789");
        assert_eq!(config.admin_email, "ops@example.com");

        // Development falls back to the built-in values with a warning.
        std::env::set_var("APP_ENV", "development");
        std::env::remove_var("JWT_SECRET");
        std::env::remove_var("ADMIN_EMAIL");
        std::env::remove_var("ADMIN_PASSWORD");
        let config = Config::from_env().unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.admin_email, DEV_ADMIN_EMAIL);
        assert_eq!(config.admin_password, DEV_ADMIN_PASSWORD);

        std::env::remove_var("APP_ENV");
    }
}
