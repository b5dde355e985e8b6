//! Password policy and strength validation.
//!
//! Follows OWASP Authentication and Password Storage cheat sheets for the
//! strength rules; expiry intervals come from tenant-independent
//! configuration, never hard-coded call sites.

use chrono::Duration;
use tessera_core::{AppError, AppResult};

/// Configurable credential lifecycle policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum accepted password length in characters.
    pub min_length: usize,
    /// Maximum accepted password length (protects the hasher from DoS).
    pub max_length: usize,
    /// Days a password stays valid after being set.
    pub expiry_days: i64,
    /// Days before expiry at which an account counts as needing a reset.
    pub warning_days: i64,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 10,
            max_length: 128,
            expiry_days: 90,
            warning_days: 7,
        }
    }
}

impl PasswordPolicy {
    /// Returns how long a freshly set password stays valid.
    #[must_use]
    pub fn expiry_interval(&self) -> Duration {
        Duration::days(self.expiry_days)
    }
}

/// Validates a plaintext password against the policy.
///
/// - Length must fall within the policy bounds.
/// - Rejects common breached passwords from an embedded list.
pub fn validate_password(password: &str, policy: &PasswordPolicy) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < policy.min_length {
        return Err(AppError::Validation(format!(
            "password must be at least {} characters",
            policy.min_length
        )));
    }

    if char_count > policy.max_length {
        return Err(AppError::Validation(format!(
            "password must not exceed {} characters",
            policy.max_length
        )));
    }

    if is_common_password(password) {
        return Err(AppError::Validation(
            "this password is too common and has appeared in data breaches".to_owned(),
        ));
    }

    Ok(())
}

/// Checks whether a password appears in the embedded common passwords list.
fn is_common_password(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|entry| *entry == lowered)
}

/// Top breached passwords (subset for fast embedded check).
/// Production deployments should integrate HaveIBeenPwned k-anonymity API.
static COMMON_PASSWORDS: &[&str] = &[
    "password",
    "123456",
    "12345678",
    "1234567890",
    "qwerty",
    "abc123",
    "monkey",
    "master",
    "dragon",
    "111111",
    "baseball",
    "iloveyou",
    "trustno1",
    "sunshine",
    "princess",
    "football",
    "shadow",
    "superman",
    "qwerty123",
    "michael",
    "password1",
    "password123",
    "welcome",
    "login",
    "admin",
    "letmein",
    "starwars",
    "passw0rd",
    "121212",
    "access",
    "hello",
    "charlie",
    "qwertyuiop",
    "whatever",
    "654321",
    "7777777",
    "123123",
    "freedom",
    "1234567",
    "12345",
];
