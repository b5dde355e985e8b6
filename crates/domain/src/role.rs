use serde::{Deserialize, Serialize};
use tessera_core::NonEmptyString;
use uuid::Uuid;

use crate::security::Permission;

/// Unique identifier for a role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A named permission set owned by a tenant.
///
/// Accounts reference roles by this record's stable [`RoleId`], never by the
/// display name, so renaming a role cannot orphan its members. The
/// assigned-account count is derived by the registry and intentionally
/// absent here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Stable role identifier.
    pub id: RoleId,
    /// Display name, unique within the tenant.
    pub name: NonEmptyString,
    /// Human-readable description.
    pub description: NonEmptyString,
    /// Granted permissions, a subset of the catalog. May be empty.
    pub permissions: Vec<Permission>,
    /// Seed roles that cannot be edited or deleted.
    pub is_system: bool,
    /// Optimistic concurrency revision, bumped by the repository on commit.
    pub revision: u64,
}

impl Role {
    /// Creates a non-system role with a fresh identifier at revision zero.
    pub fn new(
        name: NonEmptyString,
        description: NonEmptyString,
        permissions: Vec<Permission>,
    ) -> Self {
        Self {
            id: RoleId::new(),
            name,
            description,
            permissions,
            is_system: false,
            revision: 0,
        }
    }

    /// Creates a system seed role that normal operations refuse to touch.
    pub fn system(
        name: NonEmptyString,
        description: NonEmptyString,
        permissions: Vec<Permission>,
    ) -> Self {
        Self {
            is_system: true,
            ..Self::new(name, description, permissions)
        }
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::NonEmptyString;

    use super::Role;
    use crate::Permission;

    fn name(value: &str) -> NonEmptyString {
        NonEmptyString::new(value).unwrap_or_else(|_| panic!("test"))
    }

    #[test]
    fn new_roles_are_never_system() {
        let role = Role::new(name("Clerk"), name("Data entry"), vec![Permission::Dashboard]);
        assert!(!role.is_system);
        assert_eq!(role.revision, 0);
    }

    #[test]
    fn system_roles_carry_the_flag() {
        let role = Role::system(name("Administrator"), name("Full access"), Vec::new());
        assert!(role.is_system);
    }
}
