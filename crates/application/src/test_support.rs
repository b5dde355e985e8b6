//! Hand-written fakes shared by the service tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tessera_core::{AppError, AppResult, NonEmptyString, TenantId};
use tessera_domain::{Account, AccountId, Role, RoleId};

use crate::directory_ports::{
    DirectoryEvent, DirectoryEventSink, DirectoryRepository, PasswordHasher,
};

/// In-process repository fake with a mutation/read call counter.
#[derive(Default)]
pub struct FakeDirectoryRepository {
    accounts: Mutex<Vec<(Account, String)>>,
    roles: Mutex<Vec<Role>>,
    calls: AtomicUsize,
}

impl FakeDirectoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repository interactions observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Seeds a role without counting as a repository interaction.
    pub async fn seed_role(&self, role: Role) {
        self.roles.lock().await.push(role);
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DirectoryRepository for FakeDirectoryRepository {
    async fn list_accounts(&self, _tenant_id: TenantId) -> AppResult<Vec<Account>> {
        self.touch();
        let mut accounts: Vec<Account> = self
            .accounts
            .lock()
            .await
            .iter()
            .map(|(account, _)| account.clone())
            .collect();
        accounts.sort_by(|left, right| left.username.as_str().cmp(right.username.as_str()));
        Ok(accounts)
    }

    async fn find_account(
        &self,
        _tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<Option<Account>> {
        self.touch();
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|(account, _)| account.id == account_id)
            .map(|(account, _)| account.clone()))
    }

    async fn find_account_by_username(
        &self,
        _tenant_id: TenantId,
        username: &str,
    ) -> AppResult<Option<Account>> {
        self.touch();
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|(account, _)| account.username.as_str() == username)
            .map(|(account, _)| account.clone()))
    }

    async fn find_account_by_email(
        &self,
        _tenant_id: TenantId,
        email: &str,
    ) -> AppResult<Option<Account>> {
        self.touch();
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|(account, _)| account.email.as_str() == email)
            .map(|(account, _)| account.clone()))
    }

    async fn insert_account(
        &self,
        _tenant_id: TenantId,
        account: Account,
        password_hash: &str,
    ) -> AppResult<Account> {
        self.touch();
        let mut accounts = self.accounts.lock().await;

        if accounts
            .iter()
            .any(|(existing, _)| existing.username == account.username)
        {
            return Err(AppError::Conflict("username already taken".to_owned()));
        }
        if accounts
            .iter()
            .any(|(existing, _)| existing.email == account.email)
        {
            return Err(AppError::Conflict("email already in use".to_owned()));
        }

        accounts.push((account.clone(), password_hash.to_owned()));
        Ok(account)
    }

    async fn update_account(&self, _tenant_id: TenantId, account: Account) -> AppResult<Account> {
        self.touch();
        let mut accounts = self.accounts.lock().await;

        let Some(slot) = accounts
            .iter_mut()
            .find(|(existing, _)| existing.id == account.id)
        else {
            return Err(AppError::NotFound("account does not exist".to_owned()));
        };

        if slot.0.revision != account.revision {
            return Err(AppError::Conflict("account was modified concurrently".to_owned()));
        }

        let mut updated = account;
        updated.revision += 1;
        slot.0 = updated.clone();
        Ok(updated)
    }

    async fn update_account_credential(
        &self,
        tenant_id: TenantId,
        account: Account,
        password_hash: &str,
    ) -> AppResult<Account> {
        let updated = self.update_account(tenant_id, account).await?;

        let mut accounts = self.accounts.lock().await;
        if let Some(slot) = accounts
            .iter_mut()
            .find(|(existing, _)| existing.id == updated.id)
        {
            slot.1 = password_hash.to_owned();
        }

        Ok(updated)
    }

    async fn remove_account(
        &self,
        _tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<()> {
        self.touch();
        let mut accounts = self.accounts.lock().await;
        let before = accounts.len();
        accounts.retain(|(account, _)| account.id != account_id);

        if accounts.len() == before {
            return Err(AppError::NotFound("account does not exist".to_owned()));
        }

        Ok(())
    }

    async fn count_accounts_with_role(
        &self,
        _tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<u64> {
        self.touch();
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .filter(|(account, _)| account.role_id == role_id)
            .count() as u64)
    }

    async fn list_roles(&self, _tenant_id: TenantId) -> AppResult<Vec<Role>> {
        self.touch();
        let mut roles = self.roles.lock().await.clone();
        roles.sort_by(|left, right| left.name.as_str().cmp(right.name.as_str()));
        Ok(roles)
    }

    async fn find_role(&self, _tenant_id: TenantId, role_id: RoleId) -> AppResult<Option<Role>> {
        self.touch();
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.id == role_id)
            .cloned())
    }

    async fn find_role_by_name(
        &self,
        _tenant_id: TenantId,
        name: &str,
    ) -> AppResult<Option<Role>> {
        self.touch();
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.name.as_str() == name)
            .cloned())
    }

    async fn insert_role(&self, _tenant_id: TenantId, role: Role) -> AppResult<Role> {
        self.touch();
        let mut roles = self.roles.lock().await;

        if roles.iter().any(|existing| existing.name == role.name) {
            return Err(AppError::Conflict("role name already taken".to_owned()));
        }

        roles.push(role.clone());
        Ok(role)
    }

    async fn update_role(&self, _tenant_id: TenantId, role: Role) -> AppResult<Role> {
        self.touch();
        let mut roles = self.roles.lock().await;

        let Some(slot) = roles.iter_mut().find(|existing| existing.id == role.id) else {
            return Err(AppError::NotFound("role does not exist".to_owned()));
        };

        if slot.revision != role.revision {
            return Err(AppError::Conflict("role was modified concurrently".to_owned()));
        }

        let mut updated = role;
        updated.revision += 1;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_role(&self, _tenant_id: TenantId, role_id: RoleId) -> AppResult<()> {
        self.touch();
        let accounts = self.accounts.lock().await;
        let mut roles = self.roles.lock().await;

        let referencing = accounts
            .iter()
            .filter(|(account, _)| account.role_id == role_id)
            .count();
        if referencing > 0 {
            return Err(AppError::Conflict(format!(
                "role is still assigned to {referencing} account(s)"
            )));
        }

        let before = roles.len();
        roles.retain(|role| role.id != role_id);

        if roles.len() == before {
            return Err(AppError::NotFound("role does not exist".to_owned()));
        }

        Ok(())
    }
}

/// Deterministic hasher for tests.
pub struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Event sink recording everything it receives.
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DirectoryEvent>>,
}

impl RecordingEventSink {
    pub async fn events(&self) -> Vec<DirectoryEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl DirectoryEventSink for RecordingEventSink {
    async fn publish(&self, event: DirectoryEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Builds a role for seeding fakes.
pub fn role_named(name: &str) -> Role {
    Role::new(
        NonEmptyString::new(name).unwrap_or_else(|_| panic!("test role name")),
        NonEmptyString::new("test role").unwrap_or_else(|_| panic!("test role description")),
        Vec::new(),
    )
}

/// Convenience bundle wiring the fakes into service constructors.
pub struct TestHarness {
    pub repository: Arc<FakeDirectoryRepository>,
    pub events: Arc<RecordingEventSink>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(FakeDirectoryRepository::new()),
            events: Arc::new(RecordingEventSink::default()),
        }
    }
}
