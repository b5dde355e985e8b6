//! Account directory application service.
//!
//! Owns the account lifecycle: invitation, updates, removal, status and
//! two-factor toggles, credential resets, and the derived password-expiry
//! views. Role references are resolved against the role registry on every
//! call; accounts hold the stable role identifier, never the display name.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use tessera_core::{AppError, AppResult, NonEmptyString, TenantId};
use tessera_domain::{
    Account, AccountId, AccountStatus, EmailAddress, PasswordPolicy, Role, Username,
    validate_password,
};

use crate::directory_ports::{
    DirectoryEvent, DirectoryEventSink, DirectoryRepository, DirectoryStats, InviteAccountInput,
    PasswordHasher, UpdateAccountInput,
};

mod credentials;
mod invite;
mod queries;
mod status;
mod update;


/// Application service for tenant account administration.
#[derive(Clone)]
pub struct AccountService {
    repository: Arc<dyn DirectoryRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    events: Arc<dyn DirectoryEventSink>,
    policy: PasswordPolicy,
}

impl AccountService {
    /// Creates a new account service with the given credential policy.
    #[must_use]
    pub fn new(
        repository: Arc<dyn DirectoryRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        events: Arc<dyn DirectoryEventSink>,
        policy: PasswordPolicy,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            events,
            policy,
        }
    }

    /// Returns all accounts in tenant scope.
    pub async fn list_accounts(&self, tenant_id: TenantId) -> AppResult<Vec<Account>> {
        self.repository.list_accounts(tenant_id).await
    }

    /// Returns an account by identifier, failing with `NotFound` when absent.
    pub async fn get_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<Account> {
        self.require_account(tenant_id, account_id).await
    }

    /// Removes an account permanently. Removing an already-removed account
    /// fails with `NotFound`; callers must treat that distinctly from
    /// success.
    pub async fn remove_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<()> {
        self.repository.remove_account(tenant_id, account_id).await?;

        let _ = self
            .events
            .publish(DirectoryEvent::AccountRemoved {
                tenant_id,
                account_id,
            })
            .await;

        Ok(())
    }

    async fn require_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<Account> {
        self.repository
            .find_account(tenant_id, account_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account '{account_id}' does not exist")))
    }

    async fn resolve_role(&self, tenant_id: TenantId, role_name: &str) -> AppResult<Role> {
        self.repository
            .find_role_by_name(tenant_id, role_name)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!("role '{role_name}' does not exist in this tenant"))
            })
    }
}
