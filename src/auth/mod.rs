//! Authentication and authorization module
//!
//! Cookie-carried sessions, bcrypt password hashing and role checks.

mod middleware;
mod session;

pub use middleware::{
    require_role, session_middleware, AdminUser, CurrentUser, MaybeUser, StaffUser,
};
pub use session::{Claims, SessionKeys};

use crate::config::AdminAccount;
use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::NewUser;
use bcrypt::{hash, verify, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages tour guides, feedback and registration requests
    Admin,
    /// Publishes tours and resources once accepted by an admin
    TravelAgent,
    /// Browses, books and leaves feedback
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::TravelAgent => "travel_agent",
            Role::Customer => "customer",
        }
    }

    pub fn can_manage_tours(&self) -> bool {
        matches!(self, Role::Admin | Role::TravelAgent)
    }

    pub fn can_administer(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "travel_agent" => Ok(Role::TravelAgent),
            "customer" => Ok(Role::Customer),
            other => Err(AppError::Internal(format!("Unknown role '{}'", other))),
        }
    }
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored bcrypt hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    verify(password, password_hash)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}

/// Create the configured administrator unless the email is already taken
pub async fn ensure_admin(users: &dyn UserRepository, account: &AdminAccount) -> Result<bool, AppError> {
    if users.find_by_email(&account.email).await?.is_some() {
        return Ok(false);
    }

    let admin = users
        .insert(NewUser {
            email: account.email.clone(),
            password_hash: hash_password(&account.password)?,
            first_name: Some("Admin".to_string()),
            last_name: None,
            phone_number: None,
            role: Role::Admin,
            registration_status: None,
        })
        .await?;

    info!("Seeded administrator {} (id: {})", admin.email, admin.user_id);
    Ok(true)
}
