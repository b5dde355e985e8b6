use tessera_domain::Department;

/// Input payload for inviting a new account.
///
/// The role is named, not identified: the service resolves it against the
/// role registry at call time. Permission and field validation happen
/// before any repository interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteAccountInput {
    /// Login name, unique within the tenant.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact address, unique within the tenant.
    pub email: String,
    /// Display name of an existing role in the tenant.
    pub role_name: String,
    /// Organizational department.
    pub department: Department,
    /// Initial plaintext password.
    pub password: String,
    /// Confirmation that must match `password` bit-for-bit.
    pub password_confirmation: String,
}

/// Input payload for updating the mutable fields of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAccountInput {
    /// Login name, unique within the tenant.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact address, unique within the tenant.
    pub email: String,
    /// Display name of an existing role; re-resolved on every update.
    pub role_name: String,
    /// Organizational department.
    pub department: Department,
}

/// Input payload for creating custom roles.
///
/// Permission tags arrive as transport strings so the registry can reject
/// unknown tags explicitly rather than dropping them at the edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name in tenant scope.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Permission tags to attach to the role.
    pub permissions: Vec<String>,
}

/// Input payload for updating a role's name, description, or grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// Unique role name in tenant scope.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Permission tags to attach to the role.
    pub permissions: Vec<String>,
}
