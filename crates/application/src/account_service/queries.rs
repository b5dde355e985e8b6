use super::*;

impl AccountService {
    /// Returns accounts whose password expires within `threshold_days` of
    /// `now`, including already-expired ones.
    ///
    /// This is a pure function over the current account set and is
    /// recomputed on every call, since `now` is an input. The threshold
    /// arrives from callers unvalidated and must stay within what a
    /// `Duration` can represent.
    pub async fn accounts_needing_password_reset(
        &self,
        tenant_id: TenantId,
        now: DateTime<Utc>,
        threshold_days: i64,
    ) -> AppResult<Vec<Account>> {
        let threshold = Duration::try_days(threshold_days).ok_or_else(|| {
            AppError::Validation(format!(
                "threshold of {threshold_days} days is out of range"
            ))
        })?;
        let accounts = self.repository.list_accounts(tenant_id).await?;

        Ok(accounts
            .into_iter()
            .filter(|account| account.password_expires_at - now <= threshold)
            .collect())
    }

    /// Returns derived directory counters. Computed per call, never cached.
    pub async fn directory_stats(&self, tenant_id: TenantId) -> AppResult<DirectoryStats> {
        let accounts = self.repository.list_accounts(tenant_id).await?;

        let active = accounts
            .iter()
            .filter(|account| account.status == AccountStatus::Active)
            .count() as u64;
        let two_factor_enabled = accounts
            .iter()
            .filter(|account| account.two_factor_enabled)
            .count() as u64;
        let total = accounts.len() as u64;

        Ok(DirectoryStats {
            total,
            active,
            inactive: total - active,
            two_factor_enabled,
        })
    }
}
