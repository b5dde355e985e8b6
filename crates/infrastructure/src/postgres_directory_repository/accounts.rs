use super::*;

const ACCOUNT_COLUMNS: &str = "id, username, full_name, email, role_id, department, status, \
     two_factor_enabled, password_expires_at, login_count, last_login_at, revision";

impl PostgresDirectoryRepository {
    pub(super) async fn list_accounts_impl(&self, tenant_id: TenantId) -> AppResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM directory_accounts \
             WHERE tenant_id = $1 ORDER BY username"
        ))
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| storage_error("failed to list accounts", error))?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    pub(super) async fn find_account_impl(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM directory_accounts \
             WHERE tenant_id = $1 AND id = $2"
        ))
        .bind(tenant_id.as_uuid())
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| storage_error("failed to load account", error))?;

        row.map(AccountRow::into_account).transpose()
    }

    pub(super) async fn find_account_by_username_impl(
        &self,
        tenant_id: TenantId,
        username: &str,
    ) -> AppResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM directory_accounts \
             WHERE tenant_id = $1 AND username = LOWER($2)"
        ))
        .bind(tenant_id.as_uuid())
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| storage_error("failed to look up account by username", error))?;

        row.map(AccountRow::into_account).transpose()
    }

    pub(super) async fn find_account_by_email_impl(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> AppResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM directory_accounts \
             WHERE tenant_id = $1 AND email = LOWER($2)"
        ))
        .bind(tenant_id.as_uuid())
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| storage_error("failed to look up account by email", error))?;

        row.map(AccountRow::into_account).transpose()
    }

    pub(super) async fn insert_account_impl(
        &self,
        tenant_id: TenantId,
        account: Account,
        password_hash: &str,
    ) -> AppResult<Account> {
        sqlx::query(
            r#"
            INSERT INTO directory_accounts (
                tenant_id, id, username, full_name, email, role_id, department,
                status, two_factor_enabled, password_hash, password_expires_at,
                login_count, last_login_at, revision
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 0)
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(account.id.as_uuid())
        .bind(account.username.as_str())
        .bind(account.full_name.as_str())
        .bind(account.email.as_str())
        .bind(account.role_id.as_uuid())
        .bind(account.department.as_str())
        .bind(account.status.as_str())
        .bind(account.two_factor_enabled)
        .bind(password_hash)
        .bind(account.password_expires_at)
        .bind(account.login_count as i64)
        .bind(account.last_login_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            write_error(
                "failed to insert account",
                "username or email already exists in this tenant",
                error,
            )
        })?;

        Ok(account)
    }

    pub(super) async fn update_account_impl(
        &self,
        tenant_id: TenantId,
        account: Account,
        password_hash: Option<&str>,
    ) -> AppResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE directory_accounts SET \
                 username = $4, full_name = $5, email = $6, role_id = $7, \
                 department = $8, status = $9, two_factor_enabled = $10, \
                 password_expires_at = $11, login_count = $12, last_login_at = $13, \
                 password_hash = COALESCE($14, password_hash), \
                 revision = revision + 1, updated_at = now() \
             WHERE tenant_id = $1 AND id = $2 AND revision = $3 \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(tenant_id.as_uuid())
        .bind(account.id.as_uuid())
        .bind(account.revision as i64)
        .bind(account.username.as_str())
        .bind(account.full_name.as_str())
        .bind(account.email.as_str())
        .bind(account.role_id.as_uuid())
        .bind(account.department.as_str())
        .bind(account.status.as_str())
        .bind(account.two_factor_enabled)
        .bind(account.password_expires_at)
        .bind(account.login_count as i64)
        .bind(account.last_login_at)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            write_error(
                "failed to update account",
                "username or email already exists in this tenant",
                error,
            )
        })?;

        match row {
            Some(row) => row.into_account(),
            None => Err(self.account_update_miss(tenant_id, account.id).await),
        }
    }

    pub(super) async fn remove_account_impl(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM directory_accounts WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id.as_uuid())
        .bind(account_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| storage_error("failed to remove account", error))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "account '{account_id}' does not exist"
            )));
        }

        Ok(())
    }

    pub(super) async fn count_accounts_with_role_impl(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM directory_accounts WHERE tenant_id = $1 AND role_id = $2",
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| storage_error("failed to count role assignments", error))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Distinguishes a vanished account from a stale revision after a
    /// zero-row optimistic update.
    async fn account_update_miss(&self, tenant_id: TenantId, account_id: AccountId) -> AppError {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM directory_accounts WHERE tenant_id = $1 AND id = $2)",
        )
        .bind(tenant_id.as_uuid())
        .bind(account_id.as_uuid())
        .fetch_one(&self.pool)
        .await;

        match exists {
            Ok(true) => AppError::Conflict(format!(
                "account '{account_id}' was modified concurrently"
            )),
            Ok(false) => AppError::NotFound(format!("account '{account_id}' does not exist")),
            Err(error) => storage_error("failed to inspect account after update miss", error),
        }
    }
}
