//! Revoked-token set.
//!
//! Tokens revoked by logout are rejected for the rest of their validity
//! window. Each entry carries the token's own expiry so a periodic sweep
//! can drop entries the verifier already rejects, bounding the set to the
//! TTL window instead of growing for the process lifetime.

use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

pub struct TokenBlacklist {
    // token string -> expiry of that token (unix seconds)
    entries: Mutex<HashMap<String, i64>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a token. Idempotent - re-revoking is a no-op in effect.
    pub fn revoke(&self, token: &str, expires_at: i64) {
        let mut entries = self.entries.lock();
        entries.entry(token.to_string()).or_insert(expires_at);
        debug!("Token revoked ({} blacklisted total)", entries.len());
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.entries.lock().contains_key(token)
    }

    /// Drop entries whose token expiry has passed. Returns how many were
    /// removed.
    pub fn sweep(&self, now: i64) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for TokenBlacklist {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience for tests and the sweeper task.
pub fn now_ts() -> i64 {
    Utc::now().timestamp()
}
