//! Token codec: sign and verify the JWT claim set.

use crate::auth::models::{Claims, UserAccount};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

pub struct TokenCodec {
    secret: String,
    ttl_hours: i64,
}

impl TokenCodec {
    pub fn new(secret: String, ttl_hours: i64) -> Self {
        Self { secret, ttl_hours }
    }

    /// Sign a claim set for the given account. Returns the token and its
    /// expiry as a unix timestamp.
    pub fn issue(&self, account: &UserAccount) -> Result<(String, i64)> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(chrono::Duration::hours(self.ttl_hours))
            .context("Invalid timestamp")?
            .timestamp();

        let claims = Claims {
            sub: account.id.to_string(),
            email: account.email.clone(),
            user_type: account.role.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            iat: now.timestamp() as usize,
            exp: expires_at as usize,
        };

        debug!(
            "Issuing token for {} ({}), expires in {}h",
            account.email, account.id, self.ttl_hours
        );

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")?;

        Ok((token, expires_at))
    }

    /// Verify signature and expiry. Every failure mode (malformed, expired,
    /// bad signature) collapses into `None` - callers get a branch, not a
    /// catch block, and cannot tell "expired" from "forged".
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0; // expiry is a hard edge, no grace window

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(decoded) => {
                debug!("Verified token for {}", decoded.claims.email);
                Some(decoded.claims)
            }
            Err(e) => {
                debug!("Token verification failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{AccountStatus, Role};
    use uuid::Uuid;

    fn sample_account() -> UserAccount {
        UserAccount {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Admin,
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            status: AccountStatus::Active,
            created_at: Utc::now().to_rfc3339(),
            updated_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let codec = TokenCodec::new("test-secret-key-12345".to_string(), 24);
        let account = sample_account();

        let (token, expires_at) = codec.issue(&account).unwrap();
        assert!(!token.is_empty());
        assert!(expires_at > Utc::now().timestamp());

        let claims = codec.verify(&token).expect("fresh token should verify");
        assert_eq!(claims.sub, account.id.to_string());
        assert_eq!(claims.email, account.email);
        assert_eq!(claims.user_type, Role::Admin);
        assert_eq!(claims.first_name, "Ada");
        assert_eq!(claims.last_name, "Admin");
        assert_eq!(claims.exp as i64, expires_at);
    }

    #[test]
    fn test_malformed_token_rejected() {
        let codec = TokenCodec::new("test-secret-key-12345".to_string(), 24);
        assert!(codec.verify("not.a.token").is_none());
        assert!(codec.verify("").is_none());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let codec1 = TokenCodec::new("secret-one".to_string(), 24);
        let codec2 = TokenCodec::new("secret-two".to_string(), 24);

        let (token, _) = codec1.issue(&sample_account()).unwrap();
        assert!(codec2.verify(&token).is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL puts the expiry in the past; with zero leeway the
        // token must fail verification deterministically.
        let codec = TokenCodec::new("test-secret-key-12345".to_string(), -1);
        let (token, _) = codec.issue(&sample_account()).unwrap();
        assert!(codec.verify(&token).is_none());
    }
}
