//! PostgreSQL-backed directory repository.
//!
//! Optimistic concurrency: every update carries the revision the caller
//! read and commits through `WHERE revision = $n`; a zero-row update is
//! disambiguated into `NotFound` or `Conflict`. Role deletion counts
//! referencing accounts and deletes inside one transaction.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;

use tessera_application::DirectoryRepository;
use tessera_core::{AppError, AppResult, NonEmptyString, TenantId};
use tessera_domain::{
    Account, AccountId, AccountStatus, Department, EmailAddress, Permission, Role, RoleId,
    Username,
};

mod accounts;
mod roles;

/// PostgreSQL implementation of the directory repository port.
#[derive(Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: uuid::Uuid,
    username: String,
    full_name: String,
    email: String,
    role_id: uuid::Uuid,
    department: String,
    status: String,
    two_factor_enabled: bool,
    password_expires_at: chrono::DateTime<chrono::Utc>,
    login_count: i64,
    last_login_at: Option<chrono::DateTime<chrono::Utc>>,
    revision: i64,
}

impl AccountRow {
    fn into_account(self) -> AppResult<Account> {
        Ok(Account {
            id: AccountId::from_uuid(self.id),
            username: Username::new(self.username)?,
            full_name: NonEmptyString::new(self.full_name)?,
            email: EmailAddress::new(self.email)?,
            role_id: RoleId::from_uuid(self.role_id),
            department: Department::from_str(&self.department)?,
            status: AccountStatus::from_str(&self.status)?,
            two_factor_enabled: self.two_factor_enabled,
            password_expires_at: self.password_expires_at,
            login_count: non_negative("login_count", self.login_count)?,
            last_login_at: self.last_login_at,
            revision: non_negative("revision", self.revision)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    permissions: Vec<String>,
    is_system: bool,
    revision: i64,
}

impl RoleRow {
    fn into_role(self) -> AppResult<Role> {
        let permissions = self
            .permissions
            .iter()
            .map(|value| Permission::from_str(value))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Role {
            id: RoleId::from_uuid(self.id),
            name: NonEmptyString::new(self.name)?,
            description: NonEmptyString::new(self.description)?,
            permissions,
            is_system: self.is_system,
            revision: non_negative("revision", self.revision)?,
        })
    }
}

/// Stored counters are non-negative by construction; a negative value means
/// the row was tampered with and must surface, not decay to zero.
fn non_negative(column: &str, value: i64) -> AppResult<u64> {
    u64::try_from(value)
        .map_err(|_| AppError::Internal(format!("stored {column} is negative: {value}")))
}


fn storage_error(context: &str, error: sqlx::Error) -> AppError {
    AppError::Transport(format!("{context}: {error}"))
}

/// Maps unique-index violations to `Conflict`, foreign-key violations (a
/// role reference that lost the race against a delete) to `Validation`,
/// and everything else to `Transport`.
fn write_error(context: &str, conflict_message: &str, error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(database_error) = &error {
        if database_error.is_unique_violation() {
            return AppError::Conflict(conflict_message.to_owned());
        }
        if database_error.is_foreign_key_violation() {
            return AppError::Validation(
                "role reference no longer resolves in this tenant".to_owned(),
            );
        }
    }

    storage_error(context, error)
}

#[async_trait]
impl DirectoryRepository for PostgresDirectoryRepository {
    async fn list_accounts(&self, tenant_id: TenantId) -> AppResult<Vec<Account>> {
        self.list_accounts_impl(tenant_id).await
    }

    async fn find_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<Option<Account>> {
        self.find_account_impl(tenant_id, account_id).await
    }

    async fn find_account_by_username(
        &self,
        tenant_id: TenantId,
        username: &str,
    ) -> AppResult<Option<Account>> {
        self.find_account_by_username_impl(tenant_id, username).await
    }

    async fn find_account_by_email(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> AppResult<Option<Account>> {
        self.find_account_by_email_impl(tenant_id, email).await
    }

    async fn insert_account(
        &self,
        tenant_id: TenantId,
        account: Account,
        password_hash: &str,
    ) -> AppResult<Account> {
        self.insert_account_impl(tenant_id, account, password_hash)
            .await
    }

    async fn update_account(&self, tenant_id: TenantId, account: Account) -> AppResult<Account> {
        self.update_account_impl(tenant_id, account, None).await
    }

    async fn update_account_credential(
        &self,
        tenant_id: TenantId,
        account: Account,
        password_hash: &str,
    ) -> AppResult<Account> {
        self.update_account_impl(tenant_id, account, Some(password_hash))
            .await
    }

    async fn remove_account(&self, tenant_id: TenantId, account_id: AccountId) -> AppResult<()> {
        self.remove_account_impl(tenant_id, account_id).await
    }

    async fn count_accounts_with_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<u64> {
        self.count_accounts_with_role_impl(tenant_id, role_id).await
    }

    async fn list_roles(&self, tenant_id: TenantId) -> AppResult<Vec<Role>> {
        self.list_roles_impl(tenant_id).await
    }

    async fn find_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<Option<Role>> {
        self.find_role_impl(tenant_id, role_id).await
    }

    async fn find_role_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> AppResult<Option<Role>> {
        self.find_role_by_name_impl(tenant_id, name).await
    }

    async fn insert_role(&self, tenant_id: TenantId, role: Role) -> AppResult<Role> {
        self.insert_role_impl(tenant_id, role).await
    }

    async fn update_role(&self, tenant_id: TenantId, role: Role) -> AppResult<Role> {
        self.update_role_impl(tenant_id, role).await
    }

    async fn delete_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<()> {
        self.delete_role_impl(tenant_id, role_id).await
    }
}
