//! One-time password store for the password reset flow.
//!
//! One active OTP per email; a re-request supersedes the previous code.
//! Records are deleted on successful password update or on the first
//! check made past their TTL.

use chrono::Utc;
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub code: String,
    pub expires_at: i64,
    pub created_at: i64,
}

/// Outcome of an OTP check.
#[derive(Debug, PartialEq, Eq)]
pub enum OtpCheck {
    Valid,
    Missing,
    Mismatch,
    Expired,
}

pub struct OtpStore {
    ttl_minutes: i64,
    entries: Mutex<HashMap<String, OtpRecord>>,
}

impl OtpStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl_minutes,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Generate a 6-digit code for the email, superseding any active one.
    pub fn issue(&self, email: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
        let now = Utc::now().timestamp();
        self.entries.lock().insert(
            email.to_string(),
            OtpRecord {
                code: code.clone(),
                expires_at: now + self.ttl_minutes * 60,
                created_at: now,
            },
        );
        code
    }

    /// Check a supplied code. An expired record is consumed here; a
    /// mismatched code leaves the record in place for a retry.
    pub fn verify(&self, email: &str, code: &str, now: i64) -> OtpCheck {
        let mut entries = self.entries.lock();
        let Some(record) = entries.get(email) else {
            return OtpCheck::Missing;
        };

        if now >= record.expires_at {
            entries.remove(email);
            return OtpCheck::Expired;
        }

        if record.code != code {
            return OtpCheck::Mismatch;
        }

        OtpCheck::Valid
    }

    /// Delete the record after a successful password update.
    pub fn consume(&self, email: &str) -> Option<OtpRecord> {
        self.entries.lock().remove(email)
    }

    pub fn peek(&self, email: &str) -> Option<OtpRecord> {
        self.entries.lock().get(email).cloned()
    }
}
