//! Role registry application service.
//!
//! Single source of truth for valid permission sets. Enforces catalog
//! membership on every write, protects system roles, and blocks deletion of
//! roles still referenced by accounts.

use std::sync::Arc;

use tessera_core::{AppError, AppResult, NonEmptyString, TenantId};
use tessera_domain::{Permission, Role, RoleId};

use crate::directory_ports::{
    CreateRoleInput, DirectoryEvent, DirectoryEventSink, DirectoryRepository, RoleSummary,
    UpdateRoleInput,
};

#[cfg(test)]
mod tests;

/// Application service for tenant role administration.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn DirectoryRepository>,
    events: Arc<dyn DirectoryEventSink>,
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(repository: Arc<dyn DirectoryRepository>, events: Arc<dyn DirectoryEventSink>) -> Self {
        Self { repository, events }
    }

    /// Returns tenant roles with their derived assigned-account counts.
    pub async fn list_roles(&self, tenant_id: TenantId) -> AppResult<Vec<RoleSummary>> {
        let roles = self.repository.list_roles(tenant_id).await?;

        let mut summaries = Vec::with_capacity(roles.len());
        for role in roles {
            let assigned_accounts = self
                .repository
                .count_accounts_with_role(tenant_id, role.id)
                .await?;
            summaries.push(summarize(role, assigned_accounts));
        }

        Ok(summaries)
    }

    /// Creates a custom role. New roles are never system roles.
    pub async fn create_role(
        &self,
        tenant_id: TenantId,
        input: CreateRoleInput,
    ) -> AppResult<RoleSummary> {
        let name = NonEmptyString::new(&input.name)?;
        let description = NonEmptyString::new(&input.description)?;
        let permissions = parse_permissions(&input.permissions)?;

        if self
            .repository
            .find_role_by_name(tenant_id, name.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                name.as_str()
            )));
        }

        let role = self
            .repository
            .insert_role(tenant_id, Role::new(name, description, permissions))
            .await?;

        Ok(summarize(role, 0))
    }

    /// Updates a role's name, description, and permission set.
    ///
    /// Accounts reference roles by stable identifier, so a rename leaves
    /// existing members attached.
    pub async fn update_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<RoleSummary> {
        let mut role = self.require_role(tenant_id, role_id).await?;

        if role.is_system {
            return Err(AppError::Forbidden(format!(
                "system role '{}' cannot be edited",
                role.name.as_str()
            )));
        }

        let name = NonEmptyString::new(&input.name)?;
        let description = NonEmptyString::new(&input.description)?;
        let permissions = parse_permissions(&input.permissions)?;

        if name != role.name
            && let Some(existing) = self
                .repository
                .find_role_by_name(tenant_id, name.as_str())
                .await?
            && existing.id != role_id
        {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                name.as_str()
            )));
        }

        role.name = name;
        role.description = description;
        role.permissions = permissions;

        let updated = self.repository.update_role(tenant_id, role).await?;
        let assigned_accounts = self
            .repository
            .count_accounts_with_role(tenant_id, role_id)
            .await?;

        Ok(summarize(updated, assigned_accounts))
    }

    /// Deletes a role permanently.
    ///
    /// Fails with `Forbidden` for system roles and with `Conflict` while
    /// any account references the role; the reference check runs atomically
    /// with the delete inside the repository.
    pub async fn delete_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<()> {
        let role = self.require_role(tenant_id, role_id).await?;

        if role.is_system {
            return Err(AppError::Forbidden(format!(
                "system role '{}' cannot be deleted",
                role.name.as_str()
            )));
        }

        self.repository.delete_role(tenant_id, role_id).await?;

        let _ = self
            .events
            .publish(DirectoryEvent::RoleDeleted { tenant_id, role_id })
            .await;

        Ok(())
    }

    /// Seeds the tenant's default system roles. Idempotent: existing roles
    /// with the seed names are left untouched.
    pub async fn seed_system_roles(&self, tenant_id: TenantId) -> AppResult<()> {
        for (name, description, permissions) in seed_definitions() {
            if self
                .repository
                .find_role_by_name(tenant_id, name)
                .await?
                .is_some()
            {
                continue;
            }

            let role = Role::system(
                NonEmptyString::new(name)?,
                NonEmptyString::new(description)?,
                permissions,
            );
            self.repository.insert_role(tenant_id, role).await?;
        }

        Ok(())
    }

    async fn require_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .find_role(tenant_id, role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }
}

fn summarize(role: Role, assigned_accounts: u64) -> RoleSummary {
    RoleSummary {
        id: role.id,
        name: role.name.into(),
        description: role.description.into(),
        permissions: role.permissions,
        is_system: role.is_system,
        assigned_accounts,
    }
}

/// Validates permission tags against the catalog. Unknown tags are
/// rejected, never silently dropped or accepted.
fn parse_permissions(values: &[String]) -> AppResult<Vec<Permission>> {
    values
        .iter()
        .map(|value| Permission::from_transport(value))
        .collect()
}

fn seed_definitions() -> Vec<(&'static str, &'static str, Vec<Permission>)> {
    vec![
        (
            "Administrator",
            "Full access to every surface",
            Permission::all().to_vec(),
        ),
        (
            "Member",
            "Dashboard access only",
            vec![Permission::Dashboard],
        ),
    ]
}
