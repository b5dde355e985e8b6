use tessera_application::{AccountService, RoleService};

/// Shared services available to request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Account directory operations.
    pub account_service: AccountService,
    /// Role registry operations.
    pub role_service: RoleService,
}
