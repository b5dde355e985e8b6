use super::*;

impl AccountService {
    /// Invites a new account into the tenant.
    ///
    /// Password and confirmation are compared before any repository
    /// interaction; a mismatch never reaches storage. The role name must
    /// resolve against the registry. New accounts start active, without
    /// two-factor, with a zero login count, and with the password expiry
    /// computed from the invitation time plus the policy interval.
    pub async fn invite_account(
        &self,
        tenant_id: TenantId,
        input: InviteAccountInput,
    ) -> AppResult<Account> {
        // Pure pre-checks, no storage contact.
        if input.password != input.password_confirmation {
            return Err(AppError::Validation(
                "password and confirmation do not match".to_owned(),
            ));
        }
        validate_password(&input.password, &self.policy)?;

        let username = Username::new(&input.username)?;
        let full_name = NonEmptyString::new(&input.full_name)?;
        let email = EmailAddress::new(&input.email)?;

        let role = self.resolve_role(tenant_id, &input.role_name).await?;

        if self
            .repository
            .find_account_by_username(tenant_id, username.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username.as_str()
            )));
        }

        if self
            .repository
            .find_account_by_email(tenant_id, email.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "email '{}' is already in use",
                email.as_str()
            )));
        }

        let password_hash = self.password_hasher.hash_password(&input.password)?;
        let now = Utc::now();

        let account = Account {
            id: AccountId::new(),
            username,
            full_name,
            email,
            role_id: role.id,
            department: input.department,
            status: AccountStatus::Active,
            two_factor_enabled: false,
            password_expires_at: now + self.policy.expiry_interval(),
            login_count: 0,
            last_login_at: None,
            revision: 0,
        };

        let created = self
            .repository
            .insert_account(tenant_id, account, &password_hash)
            .await?;

        let _ = self
            .events
            .publish(DirectoryEvent::AccountInvited {
                tenant_id,
                account_id: created.id,
            })
            .await;

        Ok(created)
    }
}
