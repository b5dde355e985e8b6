use async_trait::async_trait;

use tessera_core::{AppResult, TenantId};
use tessera_domain::{AccountId, AccountStatus, RoleId};

/// Domain events emitted after directory and registry mutations commit.
///
/// This is the attachment point for session invalidation and audit
/// pipelines; the core itself only publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    /// A new account was invited and created.
    AccountInvited {
        /// Owning tenant.
        tenant_id: TenantId,
        /// The created account.
        account_id: AccountId,
    },
    /// An account was removed.
    AccountRemoved {
        /// Owning tenant.
        tenant_id: TenantId,
        /// The removed account.
        account_id: AccountId,
    },
    /// An account switched between active and inactive.
    StatusToggled {
        /// Owning tenant.
        tenant_id: TenantId,
        /// The toggled account.
        account_id: AccountId,
        /// Status after the toggle.
        status: AccountStatus,
    },
    /// An account password was reset. Session layers must invalidate any
    /// active session material for the account on receipt.
    CredentialReset {
        /// Owning tenant.
        tenant_id: TenantId,
        /// The affected account.
        account_id: AccountId,
    },
    /// Two-factor authentication was toggled for an account.
    TwoFactorToggled {
        /// Owning tenant.
        tenant_id: TenantId,
        /// The affected account.
        account_id: AccountId,
        /// Flag value after the toggle.
        enabled: bool,
    },
    /// A role was deleted from the registry.
    RoleDeleted {
        /// Owning tenant.
        tenant_id: TenantId,
        /// The deleted role.
        role_id: RoleId,
    },
}

/// Sink port receiving committed directory events.
#[async_trait]
pub trait DirectoryEventSink: Send + Sync {
    /// Publishes a single event. Failures must not roll back the mutation
    /// that produced the event.
    async fn publish(&self, event: DirectoryEvent) -> AppResult<()>;
}
