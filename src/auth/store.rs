//! Credential storage.
//!
//! Auth depends on the `CredentialStore` trait, not a concrete map, so the
//! linear email scan can be swapped for an indexed lookup without touching
//! call sites.

use crate::auth::models::{AccountStatus, Role, UserAccount};
use crate::config::Config;
use anyhow::{Context, Result};
use bcrypt::hash;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

pub trait CredentialStore: Send + Sync {
    fn get(&self, id: &Uuid) -> Option<UserAccount>;
    fn find_by_email(&self, email: &str) -> Option<UserAccount>;
    /// Insert a new account. Fails when the email is already taken.
    fn insert(&self, account: UserAccount) -> Result<()>;
    /// Overwrite an existing account by id.
    fn update(&self, account: UserAccount) -> Result<()>;
    fn remove(&self, id: &Uuid) -> Option<UserAccount>;
    fn all(&self) -> Vec<UserAccount>;
}

/// In-memory credential store. Owns its own lock rather than reusing the
/// generic table so the email scan and the insert happen under a single
/// write guard; the uniqueness invariant is enforced here, not in the
/// handlers.
pub struct MemoryCredentialStore {
    accounts: RwLock<HashMap<Uuid, UserAccount>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, id: &Uuid) -> Option<UserAccount> {
        self.accounts.read().get(id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<UserAccount> {
        // Linear scan; fine for an in-memory store of this size.
        self.accounts
            .read()
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    fn insert(&self, account: UserAccount) -> Result<()> {
        // Scan and insert under the same guard, otherwise two concurrent
        // inserts of the same email can both pass the check.
        let mut accounts = self.accounts.write();
        if accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(&account.email))
        {
            anyhow::bail!("Email already registered: {}", account.email);
        }
        accounts.insert(account.id, account);
        Ok(())
    }

    fn update(&self, account: UserAccount) -> Result<()> {
        let mut accounts = self.accounts.write();
        if !accounts.contains_key(&account.id) {
            anyhow::bail!("Account not found: {}", account.id);
        }
        accounts.insert(account.id, account);
        Ok(())
    }

    fn remove(&self, id: &Uuid) -> Option<UserAccount> {
        self.accounts.write().remove(id)
    }

    fn all(&self) -> Vec<UserAccount> {
        self.accounts.read().values().cloned().collect()
    }
}

/// Build a new account with a freshly hashed password.
pub fn new_account(
    email: &str,
    password: &str,
    role: Role,
    first_name: &str,
    last_name: &str,
    bcrypt_cost: u32,
) -> Result<UserAccount> {
    let password_hash = hash(password, bcrypt_cost).context("Failed to hash password")?;
    let now = Utc::now().to_rfc3339();

    Ok(UserAccount {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash,
        role,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        status: AccountStatus::Active,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Seed the bootstrap admin if no admin account exists yet. The reference
/// implementation shipped with an empty store and no provisioning path, so
/// account creation has to start somewhere.
pub fn seed_bootstrap_admin(store: &dyn CredentialStore, config: &Config) -> Result<()> {
    let has_admin = store
        .all()
        .iter()
        .any(|a| matches!(a.role, Role::Admin | Role::SuperAdmin));
    if has_admin {
        return Ok(());
    }

    let admin = new_account(
        &config.admin_email,
        &config.admin_password,
        Role::Admin,
        "System",
        "Admin",
        config.bcrypt_cost,
    )?;
    store.insert(admin)?;

    info!("Bootstrap admin created: {}", config.admin_email);
    if config.environment.is_development() {
        warn!("Development admin credentials in use - do not deploy as-is");
    }

    Ok(())
}
