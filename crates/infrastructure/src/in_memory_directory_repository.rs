//! In-memory directory repository.
//!
//! Backs tests and the `memory` storage provider. Each mutating method
//! takes the write locks it needs for the whole read-modify-write section,
//! which gives the per-identifier atomicity the ports require; the role
//! delete holds both locks so the reference check and the removal cannot be
//! interleaved with an account write.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tessera_application::DirectoryRepository;
use tessera_core::{AppError, AppResult, TenantId};
use tessera_domain::{Account, AccountId, Role, RoleId};

#[cfg(test)]
mod tests;

/// In-memory directory repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryRepository {
    accounts: RwLock<HashMap<(TenantId, AccountId), (Account, String)>>,
    roles: RwLock<HashMap<(TenantId, RoleId), Role>>,
}

impl InMemoryDirectoryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            roles: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectoryRepository {
    async fn list_accounts(&self, tenant_id: TenantId) -> AppResult<Vec<Account>> {
        let accounts = self.accounts.read().await;

        let mut values: Vec<Account> = accounts
            .iter()
            .filter_map(|((stored_tenant_id, _), (account, _))| {
                (stored_tenant_id == &tenant_id).then_some(account.clone())
            })
            .collect();
        values.sort_by(|left, right| left.username.as_str().cmp(right.username.as_str()));

        Ok(values)
    }

    async fn find_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .get(&(tenant_id, account_id))
            .map(|(account, _)| account.clone()))
    }

    async fn find_account_by_username(
        &self,
        tenant_id: TenantId,
        username: &str,
    ) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .find(|((stored_tenant_id, _), (account, _))| {
                stored_tenant_id == &tenant_id && account.username.as_str() == username
            })
            .map(|(_, (account, _))| account.clone()))
    }

    async fn find_account_by_email(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .find(|((stored_tenant_id, _), (account, _))| {
                stored_tenant_id == &tenant_id && account.email.as_str() == email
            })
            .map(|(_, (account, _))| account.clone()))
    }

    async fn insert_account(
        &self,
        tenant_id: TenantId,
        account: Account,
        password_hash: &str,
    ) -> AppResult<Account> {
        // Lock order everywhere: accounts, then roles.
        let mut accounts = self.accounts.write().await;
        let roles = self.roles.read().await;

        if !roles.contains_key(&(tenant_id, account.role_id)) {
            return Err(AppError::Validation(format!(
                "role '{}' no longer exists in this tenant",
                account.role_id
            )));
        }

        let taken = accounts
            .iter()
            .any(|((stored_tenant_id, _), (existing, _))| {
                stored_tenant_id == &tenant_id
                    && (existing.username == account.username || existing.email == account.email)
            });
        if taken {
            return Err(AppError::Conflict(format!(
                "username '{}' or email '{}' already exists for tenant '{tenant_id}'",
                account.username.as_str(),
                account.email.as_str()
            )));
        }

        accounts.insert(
            (tenant_id, account.id),
            (account.clone(), password_hash.to_owned()),
        );
        Ok(account)
    }

    async fn update_account(&self, tenant_id: TenantId, account: Account) -> AppResult<Account> {
        let mut accounts = self.accounts.write().await;
        let roles = self.roles.read().await;

        if !roles.contains_key(&(tenant_id, account.role_id)) {
            return Err(AppError::Validation(format!(
                "role '{}' no longer exists in this tenant",
                account.role_id
            )));
        }

        let taken = accounts
            .iter()
            .any(|((stored_tenant_id, stored_id), (existing, _))| {
                stored_tenant_id == &tenant_id
                    && stored_id != &account.id
                    && (existing.username == account.username || existing.email == account.email)
            });
        if taken {
            return Err(AppError::Conflict(format!(
                "username '{}' or email '{}' already exists for tenant '{tenant_id}'",
                account.username.as_str(),
                account.email.as_str()
            )));
        }

        let Some((stored, _)) = accounts.get_mut(&(tenant_id, account.id)) else {
            return Err(AppError::NotFound(format!(
                "account '{}' does not exist",
                account.id
            )));
        };

        if stored.revision != account.revision {
            return Err(AppError::Conflict(format!(
                "account '{}' was modified concurrently",
                account.id
            )));
        }

        let mut updated = account;
        updated.revision += 1;
        *stored = updated.clone();

        Ok(updated)
    }

    async fn update_account_credential(
        &self,
        tenant_id: TenantId,
        account: Account,
        password_hash: &str,
    ) -> AppResult<Account> {
        let mut accounts = self.accounts.write().await;

        let Some((stored, stored_hash)) = accounts.get_mut(&(tenant_id, account.id)) else {
            return Err(AppError::NotFound(format!(
                "account '{}' does not exist",
                account.id
            )));
        };

        if stored.revision != account.revision {
            return Err(AppError::Conflict(format!(
                "account '{}' was modified concurrently",
                account.id
            )));
        }

        let mut updated = account;
        updated.revision += 1;
        *stored = updated.clone();
        *stored_hash = password_hash.to_owned();

        Ok(updated)
    }

    async fn remove_account(&self, tenant_id: TenantId, account_id: AccountId) -> AppResult<()> {
        let removed = self.accounts.write().await.remove(&(tenant_id, account_id));

        if removed.is_none() {
            return Err(AppError::NotFound(format!(
                "account '{account_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn count_accounts_with_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<u64> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .filter(|((stored_tenant_id, _), (account, _))| {
                stored_tenant_id == &tenant_id && account.role_id == role_id
            })
            .count() as u64)
    }

    async fn list_roles(&self, tenant_id: TenantId) -> AppResult<Vec<Role>> {
        let roles = self.roles.read().await;

        let mut values: Vec<Role> = roles
            .iter()
            .filter_map(|((stored_tenant_id, _), role)| {
                (stored_tenant_id == &tenant_id).then_some(role.clone())
            })
            .collect();
        values.sort_by(|left, right| left.name.as_str().cmp(right.name.as_str()));

        Ok(values)
    }

    async fn find_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .get(&(tenant_id, role_id))
            .cloned())
    }

    async fn find_role_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .iter()
            .find(|((stored_tenant_id, _), role)| {
                stored_tenant_id == &tenant_id && role.name.as_str() == name
            })
            .map(|(_, role)| role.clone()))
    }

    async fn insert_role(&self, tenant_id: TenantId, role: Role) -> AppResult<Role> {
        let mut roles = self.roles.write().await;

        let taken = roles.iter().any(|((stored_tenant_id, _), existing)| {
            stored_tenant_id == &tenant_id && existing.name == role.name
        });
        if taken {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists for tenant '{tenant_id}'",
                role.name.as_str()
            )));
        }

        roles.insert((tenant_id, role.id), role.clone());
        Ok(role)
    }

    async fn update_role(&self, tenant_id: TenantId, role: Role) -> AppResult<Role> {
        let mut roles = self.roles.write().await;

        let taken = roles.iter().any(|((stored_tenant_id, stored_id), existing)| {
            stored_tenant_id == &tenant_id && stored_id != &role.id && existing.name == role.name
        });
        if taken {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists for tenant '{tenant_id}'",
                role.name.as_str()
            )));
        }

        let Some(stored) = roles.get_mut(&(tenant_id, role.id)) else {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                role.id
            )));
        };

        if stored.revision != role.revision {
            return Err(AppError::Conflict(format!(
                "role '{}' was modified concurrently",
                role.id
            )));
        }

        let mut updated = role;
        updated.revision += 1;
        *stored = updated.clone();

        Ok(updated)
    }

    async fn delete_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<()> {
        // Same accounts-then-roles lock order as the account writers, so
        // the reference check and the removal form one serialized section.
        let accounts = self.accounts.read().await;
        let mut roles = self.roles.write().await;

        let referencing = accounts
            .iter()
            .filter(|((stored_tenant_id, _), (account, _))| {
                stored_tenant_id == &tenant_id && account.role_id == role_id
            })
            .count();
        if referencing > 0 {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' is still assigned to {referencing} account(s)"
            )));
        }

        if roles.remove(&(tenant_id, role_id)).is_none() {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        }

        Ok(())
    }
}
