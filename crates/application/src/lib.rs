//! Application services and ports for the account directory and role
//! registry.

#![forbid(unsafe_code)]

mod account_service;
mod directory_ports;
mod role_service;

#[cfg(test)]
mod test_support;

pub use account_service::AccountService;
pub use directory_ports::{
    CreateRoleInput, DirectoryEvent, DirectoryEventSink, DirectoryRepository, DirectoryStats,
    InviteAccountInput, PasswordHasher, RoleSummary, UpdateAccountInput, UpdateRoleInput,
};
pub use role_service::RoleService;
