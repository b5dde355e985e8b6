//! Event sink adapter that logs directory events.
//!
//! Stands in where a deployment would attach session invalidation or an
//! audit pipeline; events are structured log lines only.

use async_trait::async_trait;
use tracing::info;

use tessera_application::{DirectoryEvent, DirectoryEventSink};
use tessera_core::AppResult;

/// Sink that emits each directory event as a structured log line.
#[derive(Debug, Clone, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    /// Creates a new logging sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DirectoryEventSink for TracingEventSink {
    async fn publish(&self, event: DirectoryEvent) -> AppResult<()> {
        match &event {
            DirectoryEvent::AccountInvited {
                tenant_id,
                account_id,
            } => {
                info!(%tenant_id, %account_id, "account invited");
            }
            DirectoryEvent::AccountRemoved {
                tenant_id,
                account_id,
            } => {
                info!(%tenant_id, %account_id, "account removed");
            }
            DirectoryEvent::StatusToggled {
                tenant_id,
                account_id,
                status,
            } => {
                info!(%tenant_id, %account_id, status = status.as_str(), "account status toggled");
            }
            DirectoryEvent::CredentialReset {
                tenant_id,
                account_id,
            } => {
                info!(%tenant_id, %account_id, "credential reset, sessions must be invalidated");
            }
            DirectoryEvent::TwoFactorToggled {
                tenant_id,
                account_id,
                enabled,
            } => {
                info!(%tenant_id, %account_id, enabled, "two-factor toggled");
            }
            DirectoryEvent::RoleDeleted { tenant_id, role_id } => {
                info!(%tenant_id, %role_id, "role deleted");
            }
        }

        Ok(())
    }
}
