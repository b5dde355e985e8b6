//! Account domain types and validation rules.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_core::{AppError, AppResult, NonEmptyString};
use uuid::Uuid;

use crate::role::RoleId;

/// Unique identifier for an account record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Creates a new random account identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an account identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated login name, unique within a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    ///
    /// Lowercased and trimmed; 3 to 64 characters; letters, digits, and the
    /// separators `.`, `-`, `_`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation("username must not be empty".to_owned()));
        }

        if trimmed.len() < 3 || trimmed.len() > 64 {
            return Err(AppError::Validation(
                "username must be between 3 and 64 characters".to_owned(),
            ));
        }

        let valid = trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'));
        if !valid {
            return Err(AppError::Validation(
                "username may only contain letters, digits, '.', '-', and '_'".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated username string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one
    /// `@`, local part and domain are non-empty, domain contains at least
    /// one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let parts: Vec<&str> = trimmed.splitn(2, '@').collect();
        if parts.len() != 2 {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        let local = parts[0];
        let domain = parts[1];

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Organizational departments an account can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    /// Information technology.
    It,
    /// Finance.
    Finance,
    /// Sales.
    Sales,
    /// Human resources.
    Hr,
    /// Operations.
    Operations,
    /// Marketing.
    Marketing,
}

impl Department {
    /// Returns a stable storage value for this department.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::It => "it",
            Self::Finance => "finance",
            Self::Sales => "sales",
            Self::Hr => "hr",
            Self::Operations => "operations",
            Self::Marketing => "marketing",
        }
    }
}

impl FromStr for Department {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "it" => Ok(Self::It),
            "finance" => Ok(Self::Finance),
            "sales" => Ok(Self::Sales),
            "hr" => Ok(Self::Hr),
            "operations" => Ok(Self::Operations),
            "marketing" => Ok(Self::Marketing),
            _ => Err(AppError::Validation(format!(
                "unknown department '{value}'"
            ))),
        }
    }
}

/// Whether an account may participate in permission checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account is usable.
    Active,
    /// Account is suspended; consuming authorization layers must exclude it.
    Inactive,
}

impl AccountStatus {
    /// Returns the opposite status. Applying this twice is the identity.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown account status '{value}'"
            ))),
        }
    }
}

/// A tenant-scoped user account.
///
/// The `role_id` must resolve in the same tenant's role registry at every
/// read; role deletion is blocked while any account references it, so this
/// can never dangle through role removal alone. `login_count` and
/// `last_login_at` are owned by the directory and never client-settable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable account identifier.
    pub id: AccountId,
    /// Login name, unique within the tenant.
    pub username: Username,
    /// Display name.
    pub full_name: NonEmptyString,
    /// Contact address, unique within the tenant.
    pub email: EmailAddress,
    /// Reference into the tenant's role registry.
    pub role_id: RoleId,
    /// Organizational department.
    pub department: Department,
    /// Active or inactive.
    pub status: AccountStatus,
    /// Whether two-factor authentication is enabled.
    pub two_factor_enabled: bool,
    /// Instant after which the password is considered expired.
    pub password_expires_at: DateTime<Utc>,
    /// Number of recorded logins, monotonically non-decreasing.
    pub login_count: u64,
    /// Most recent recorded login, if any.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency revision, bumped by the repository on commit.
    pub revision: u64,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{AccountStatus, EmailAddress, Username};

    #[test]
    fn valid_email_is_accepted_and_lowercased() {
        let email = EmailAddress::new("USER@Example.COM");
        assert_eq!(
            email.map(String::from).unwrap_or_default(),
            "user@example.com"
        );
    }

    #[test]
    fn email_without_at_is_rejected() {
        assert!(EmailAddress::new("noatsign").is_err());
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        assert!(EmailAddress::new("user@nodot").is_err());
    }

    #[test]
    fn empty_email_is_rejected() {
        assert!(EmailAddress::new("").is_err());
    }

    #[test]
    fn username_is_normalized() {
        let username = Username::new("  J.Doe ");
        assert_eq!(username.map(String::from).unwrap_or_default(), "j.doe");
    }

    #[test]
    fn short_username_is_rejected() {
        assert!(Username::new("ab").is_err());
    }

    #[test]
    fn username_with_spaces_is_rejected() {
        assert!(Username::new("jane doe").is_err());
    }

    proptest! {
        #[test]
        fn toggling_status_twice_is_identity(active in any::<bool>()) {
            let status = if active {
                AccountStatus::Active
            } else {
                AccountStatus::Inactive
            };
            prop_assert_eq!(status.toggled().toggled(), status);
        }
    }
}
