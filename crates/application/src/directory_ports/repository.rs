use async_trait::async_trait;

use tessera_core::{AppResult, TenantId};
use tessera_domain::{Account, AccountId, Role, RoleId};

/// Repository port for tenant-scoped accounts and roles.
///
/// Uniqueness on (tenant, username), (tenant, email), and (tenant, role
/// name) is enforced by the adapter and reported as `Conflict`. Update
/// methods use the `revision` carried on the entity as an optimistic check:
/// when the stored revision differs the call fails with `Conflict` and
/// nothing is written. Adapters must apply each mutation atomically; a
/// failed call leaves the entity set unchanged.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Lists all accounts in tenant scope, ordered by username.
    async fn list_accounts(&self, tenant_id: TenantId) -> AppResult<Vec<Account>>;

    /// Finds an account by its identifier.
    async fn find_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<Option<Account>>;

    /// Finds an account by normalized username.
    async fn find_account_by_username(
        &self,
        tenant_id: TenantId,
        username: &str,
    ) -> AppResult<Option<Account>>;

    /// Finds an account by normalized email address.
    async fn find_account_by_email(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> AppResult<Option<Account>>;

    /// Inserts a new account with its password hash. Fails with `Conflict`
    /// when the username or email is already taken.
    async fn insert_account(
        &self,
        tenant_id: TenantId,
        account: Account,
        password_hash: &str,
    ) -> AppResult<Account>;

    /// Commits a modified account read at `account.revision`. Returns the
    /// stored record with the bumped revision.
    async fn update_account(&self, tenant_id: TenantId, account: Account) -> AppResult<Account>;

    /// Replaces the stored password hash together with the account fields,
    /// under the same revision check as [`Self::update_account`].
    async fn update_account_credential(
        &self,
        tenant_id: TenantId,
        account: Account,
        password_hash: &str,
    ) -> AppResult<Account>;

    /// Removes an account permanently. Fails with `NotFound` when the
    /// identifier does not resolve; removal is never a silent success.
    async fn remove_account(&self, tenant_id: TenantId, account_id: AccountId) -> AppResult<()>;

    /// Counts accounts currently referencing a role.
    async fn count_accounts_with_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<u64>;

    /// Lists all roles in tenant scope, ordered by name.
    async fn list_roles(&self, tenant_id: TenantId) -> AppResult<Vec<Role>>;

    /// Finds a role by its identifier.
    async fn find_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds a role by display name.
    async fn find_role_by_name(&self, tenant_id: TenantId, name: &str)
    -> AppResult<Option<Role>>;

    /// Inserts a new role. Fails with `Conflict` when the name is taken.
    async fn insert_role(&self, tenant_id: TenantId, role: Role) -> AppResult<Role>;

    /// Commits a modified role read at `role.revision`.
    async fn update_role(&self, tenant_id: TenantId, role: Role) -> AppResult<Role>;

    /// Removes a role permanently. The referencing-account check and the
    /// delete happen atomically: fails with `Conflict` while any account
    /// references the role, `NotFound` when the identifier does not resolve.
    async fn delete_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    /// Must run in constant time regardless of validity.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
