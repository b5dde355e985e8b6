//! Request and response payloads for the HTTP surface.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tessera_application::{
    CreateRoleInput, InviteAccountInput, RoleSummary, UpdateAccountInput, UpdateRoleInput,
};
use tessera_core::AppError;
use tessera_domain::{Account, Department};

/// Liveness probe payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Fixed "ok" marker.
    pub status: &'static str,
}

/// Account representation returned to callers. Credential material never
/// leaves the core.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Stable account identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact address.
    pub email: String,
    /// Stable identifier of the referenced role.
    pub role_id: Uuid,
    /// Department storage value.
    pub department: String,
    /// Status storage value.
    pub status: String,
    /// Whether two-factor authentication is enabled.
    pub two_factor_enabled: bool,
    /// Instant after which the password is considered expired.
    pub password_expires_at: DateTime<Utc>,
    /// Number of recorded logins.
    pub login_count: u64,
    /// Most recent recorded login, if any.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.as_uuid(),
            username: account.username.as_str().to_owned(),
            full_name: account.full_name.as_str().to_owned(),
            email: account.email.as_str().to_owned(),
            role_id: account.role_id.as_uuid(),
            department: account.department.as_str().to_owned(),
            status: account.status.as_str().to_owned(),
            two_factor_enabled: account.two_factor_enabled,
            password_expires_at: account.password_expires_at,
            login_count: account.login_count,
            last_login_at: account.last_login_at,
        }
    }
}

/// Role representation returned to callers, including the derived member
/// count.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    /// Stable role identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Permission storage values.
    pub permissions: Vec<String>,
    /// Indicates a seed role that cannot be edited or deleted.
    pub is_system: bool,
    /// Number of accounts currently referencing this role.
    pub assigned_accounts: u64,
}

impl From<RoleSummary> for RoleResponse {
    fn from(summary: RoleSummary) -> Self {
        Self {
            id: summary.id.as_uuid(),
            name: summary.name,
            description: summary.description,
            permissions: summary
                .permissions
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            is_system: summary.is_system,
            assigned_accounts: summary.assigned_accounts,
        }
    }
}

/// Payload for inviting a new account.
#[derive(Debug, Deserialize)]
pub struct InviteAccountRequest {
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact address.
    pub email: String,
    /// Display name of an existing role.
    pub role_name: String,
    /// Department storage value.
    pub department: String,
    /// Initial plaintext password.
    pub password: String,
    /// Confirmation that must match the password.
    pub password_confirmation: String,
}

impl TryFrom<InviteAccountRequest> for InviteAccountInput {
    type Error = AppError;

    fn try_from(request: InviteAccountRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: request.username,
            full_name: request.full_name,
            email: request.email,
            role_name: request.role_name,
            department: Department::from_str(&request.department)?,
            password: request.password,
            password_confirmation: request.password_confirmation,
        })
    }
}

/// Payload for updating the mutable fields of an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact address.
    pub email: String,
    /// Display name of an existing role.
    pub role_name: String,
    /// Department storage value.
    pub department: String,
}

impl TryFrom<UpdateAccountRequest> for UpdateAccountInput {
    type Error = AppError;

    fn try_from(request: UpdateAccountRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: request.username,
            full_name: request.full_name,
            email: request.email,
            role_name: request.role_name,
            department: Department::from_str(&request.department)?,
        })
    }
}

/// Payload for resetting an account password.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// New plaintext password.
    pub new_password: String,
}

/// Payload for creating a role.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    /// Display name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Permission storage values.
    pub permissions: Vec<String>,
}

impl From<CreateRoleRequest> for CreateRoleInput {
    fn from(request: CreateRoleRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            permissions: request.permissions,
        }
    }
}

/// Payload for updating a role.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// Display name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Permission storage values.
    pub permissions: Vec<String>,
}

impl From<UpdateRoleRequest> for UpdateRoleInput {
    fn from(request: UpdateRoleRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            permissions: request.permissions,
        }
    }
}

/// Query parameters for the expiring-passwords listing.
#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    /// Warning threshold in days. Defaults to the 7-day policy window.
    pub days: Option<i64>,
}
