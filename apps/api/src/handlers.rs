use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use tessera_core::TenantId;

use crate::dto::{
    AccountResponse, CreateRoleRequest, ExpiringQuery, InviteAccountRequest, ResetPasswordRequest,
    RoleResponse, UpdateAccountRequest, UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod accounts;
mod health;
mod roles;

pub use accounts::{
    delete_account_handler, directory_stats_handler, expiring_accounts_handler,
    invite_account_handler, list_accounts_handler, reset_password_handler,
    toggle_status_handler, toggle_two_factor_handler, update_account_handler,
};
pub use health::health_handler;
pub use roles::{
    create_role_handler, delete_role_handler, list_roles_handler, update_role_handler,
};
