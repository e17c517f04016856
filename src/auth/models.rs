//! Authentication models: accounts, roles, token claims, and the
//! request/response DTOs for the auth endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account record. Emails are unique across all records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub status: AccountStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// User roles for RBAC
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "super_admin")]
    SuperAdmin,
    #[serde(rename = "accountant")]
    Accountant,
    #[serde(rename = "accounting_firm_owner")]
    AccountingFirmOwner,
    #[serde(rename = "client")]
    Client,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
            Role::Accountant => "accountant",
            Role::AccountingFirmOwner => "accounting_firm_owner",
            Role::Client => "client",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "super_admin" => Some(Role::SuperAdmin),
            "accountant" => Some(Role::Accountant),
            "accounting_firm_owner" => Some(Role::AccountingFirmOwner),
            "client" => Some(Role::Client),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountStatus {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "suspended")]
    Suspended,
}

/// JWT claim set. Immutable once signed - a role change does not affect
/// already-issued tokens until they expire or are blacklisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub user_type: Role,
    pub first_name: String,
    pub last_name: String,
    pub iat: usize,
    pub exp: usize,
}

/// Login request body. The frontend sends the email as `username`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

/// User view (sanitized - never carries the password hash)
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub status: AccountStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl UserView {
    pub fn from_account(account: &UserAccount) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.clone(),
            role: account.role.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            status: account.status.clone(),
            created_at: account.created_at.clone(),
            updated_at: account.updated_at.clone(),
        }
    }
}
