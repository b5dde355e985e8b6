//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod account;
mod credential;
mod role;
mod security;

pub use account::{Account, AccountId, AccountStatus, Department, EmailAddress, Username};
pub use credential::{PasswordPolicy, validate_password};
pub use role::{Role, RoleId};
pub use security::Permission;
