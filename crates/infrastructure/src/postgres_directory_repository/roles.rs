use super::*;

const ROLE_COLUMNS: &str = "id, name, description, permissions, is_system, revision";

impl PostgresDirectoryRepository {
    pub(super) async fn list_roles_impl(&self, tenant_id: TenantId) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM directory_roles WHERE tenant_id = $1 ORDER BY name"
        ))
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| storage_error("failed to list roles", error))?;

        rows.into_iter().map(RoleRow::into_role).collect()
    }

    pub(super) async fn find_role_impl(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM directory_roles WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| storage_error("failed to load role", error))?;

        row.map(RoleRow::into_role).transpose()
    }

    pub(super) async fn find_role_by_name_impl(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM directory_roles WHERE tenant_id = $1 AND name = $2"
        ))
        .bind(tenant_id.as_uuid())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| storage_error("failed to look up role by name", error))?;

        row.map(RoleRow::into_role).transpose()
    }

    pub(super) async fn insert_role_impl(&self, tenant_id: TenantId, role: Role) -> AppResult<Role> {
        let permissions: Vec<String> = role
            .permissions
            .iter()
            .map(|permission| permission.as_str().to_owned())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO directory_roles (
                tenant_id, id, name, description, permissions, is_system, revision
            )
            VALUES ($1, $2, $3, $4, $5, $6, 0)
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(role.id.as_uuid())
        .bind(role.name.as_str())
        .bind(role.description.as_str())
        .bind(&permissions)
        .bind(role.is_system)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            write_error(
                "failed to insert role",
                "role name already exists in this tenant",
                error,
            )
        })?;

        Ok(role)
    }

    pub(super) async fn update_role_impl(&self, tenant_id: TenantId, role: Role) -> AppResult<Role> {
        let permissions: Vec<String> = role
            .permissions
            .iter()
            .map(|permission| permission.as_str().to_owned())
            .collect();

        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "UPDATE directory_roles SET \
                 name = $4, description = $5, permissions = $6, \
                 revision = revision + 1, updated_at = now() \
             WHERE tenant_id = $1 AND id = $2 AND revision = $3 \
             RETURNING {ROLE_COLUMNS}"
        ))
        .bind(tenant_id.as_uuid())
        .bind(role.id.as_uuid())
        .bind(role.revision as i64)
        .bind(role.name.as_str())
        .bind(role.description.as_str())
        .bind(&permissions)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            write_error(
                "failed to update role",
                "role name already exists in this tenant",
                error,
            )
        })?;

        match row {
            Some(row) => row.into_role(),
            None => Err(self.role_update_miss(tenant_id, role.id).await),
        }
    }

    pub(super) async fn delete_role_impl(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| storage_error("failed to begin transaction", error))?;

        // Lock the role row so a concurrent account insert against it
        // serializes behind this transaction (the FK check is the backstop).
        let locked = sqlx::query_scalar::<_, uuid::Uuid>(
            "SELECT id FROM directory_roles \
             WHERE tenant_id = $1 AND id = $2 FOR UPDATE",
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| storage_error("failed to lock role", error))?;

        if locked.is_none() {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        }

        let referencing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM directory_accounts \
             WHERE tenant_id = $1 AND role_id = $2",
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| storage_error("failed to count role assignments", error))?;

        if referencing > 0 {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' is still assigned to {referencing} account(s)"
            )));
        }

        let result = sqlx::query(
            "DELETE FROM directory_roles WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| storage_error("failed to delete role", error))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        }

        transaction
            .commit()
            .await
            .map_err(|error| storage_error("failed to commit transaction", error))
    }

    /// Distinguishes a vanished role from a stale revision after a zero-row
    /// optimistic update.
    async fn role_update_miss(&self, tenant_id: TenantId, role_id: RoleId) -> AppError {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM directory_roles WHERE tenant_id = $1 AND id = $2)",
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await;

        match exists {
            Ok(true) => {
                AppError::Conflict(format!("role '{role_id}' was modified concurrently"))
            }
            Ok(false) => AppError::NotFound(format!("role '{role_id}' does not exist")),
            Err(error) => storage_error("failed to inspect role after update miss", error),
        }
    }
}
