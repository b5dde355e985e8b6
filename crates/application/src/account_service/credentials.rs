use super::*;

impl AccountService {
    /// Resets an account password.
    ///
    /// The new password must satisfy the configured strength policy. On
    /// success the expiry window restarts from the reset time and a
    /// credential-reset event is published so the session layer can
    /// invalidate any active session material.
    pub async fn reset_password(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        new_password: &str,
    ) -> AppResult<()> {
        validate_password(new_password, &self.policy)?;

        let mut account = self.require_account(tenant_id, account_id).await?;

        let password_hash = self.password_hasher.hash_password(new_password)?;
        account.password_expires_at = Utc::now() + self.policy.expiry_interval();

        self.repository
            .update_account_credential(tenant_id, account, &password_hash)
            .await?;

        let _ = self
            .events
            .publish(DirectoryEvent::CredentialReset {
                tenant_id,
                account_id,
            })
            .await;

        Ok(())
    }
}
