use super::*;

impl AccountService {
    /// Updates the mutable fields of an account.
    ///
    /// The role name is re-validated against the registry on every call so a
    /// rename or deletion between reads is caught rather than assumed valid
    /// from a stale cache. Uniqueness of username and email is re-checked
    /// when they change.
    pub async fn update_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        input: UpdateAccountInput,
    ) -> AppResult<Account> {
        let mut account = self.require_account(tenant_id, account_id).await?;

        let username = Username::new(&input.username)?;
        let full_name = NonEmptyString::new(&input.full_name)?;
        let email = EmailAddress::new(&input.email)?;
        let role = self.resolve_role(tenant_id, &input.role_name).await?;

        if username != account.username
            && let Some(existing) = self
                .repository
                .find_account_by_username(tenant_id, username.as_str())
                .await?
            && existing.id != account_id
        {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username.as_str()
            )));
        }

        if email != account.email
            && let Some(existing) = self
                .repository
                .find_account_by_email(tenant_id, email.as_str())
                .await?
            && existing.id != account_id
        {
            return Err(AppError::Conflict(format!(
                "email '{}' is already in use",
                email.as_str()
            )));
        }

        account.username = username;
        account.full_name = full_name;
        account.email = email;
        account.role_id = role.id;
        account.department = input.department;

        self.repository.update_account(tenant_id, account).await
    }

    /// Records a successful login for an account. This is the only path
    /// that advances `login_count` and `last_login_at`.
    pub async fn record_login(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        now: DateTime<Utc>,
    ) -> AppResult<Account> {
        let mut account = self.require_account(tenant_id, account_id).await?;

        account.login_count += 1;
        account.last_login_at = Some(now);

        self.repository.update_account(tenant_id, account).await
    }
}
