use super::*;

impl AccountService {
    /// Flips the account between active and inactive.
    ///
    /// The read and write run under the repository's revision check, so a
    /// concurrent toggle, update, or removal aborts this call with
    /// `Conflict`/`NotFound` instead of resurrecting stale state. Applying
    /// the toggle twice restores the original status with no other field
    /// changed.
    pub async fn toggle_status(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<Account> {
        let mut account = self.require_account(tenant_id, account_id).await?;

        account.status = account.status.toggled();

        let updated = self.repository.update_account(tenant_id, account).await?;

        let _ = self
            .events
            .publish(DirectoryEvent::StatusToggled {
                tenant_id,
                account_id,
                status: updated.status,
            })
            .await;

        Ok(updated)
    }

    /// Flips the two-factor-enabled flag. No side effects on other fields.
    pub async fn toggle_two_factor(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> AppResult<Account> {
        let mut account = self.require_account(tenant_id, account_id).await?;

        account.two_factor_enabled = !account.two_factor_enabled;

        let updated = self.repository.update_account(tenant_id, account).await?;

        let _ = self
            .events
            .publish(DirectoryEvent::TwoFactorToggled {
                tenant_id,
                account_id,
                enabled: updated.two_factor_enabled,
            })
            .await;

        Ok(updated)
    }
}
