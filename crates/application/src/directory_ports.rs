//! Ports shared by the account directory and role registry services.

mod events;
mod inputs;
mod repository;

pub use events::{DirectoryEvent, DirectoryEventSink};
pub use inputs::{CreateRoleInput, InviteAccountInput, UpdateAccountInput, UpdateRoleInput};
pub use repository::{DirectoryRepository, PasswordHasher};

use serde::Serialize;
use tessera_domain::{Permission, RoleId};

/// Role read model returned to callers, with the derived member count.
///
/// The count is recomputed from current account references on every listing
/// and is never accepted as input or stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    /// Stable role identifier.
    pub id: RoleId,
    /// Unique role name in tenant scope.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Effective role grants.
    pub permissions: Vec<Permission>,
    /// Indicates a seed role that cannot be edited or deleted.
    pub is_system: bool,
    /// Number of accounts currently referencing this role.
    pub assigned_accounts: u64,
}

/// Derived directory counters, computed per call and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    /// Total number of accounts in the tenant.
    pub total: u64,
    /// Accounts with active status.
    pub active: u64,
    /// Accounts with inactive status.
    pub inactive: u64,
    /// Accounts with two-factor authentication enabled.
    pub two_factor_enabled: u64,
}
