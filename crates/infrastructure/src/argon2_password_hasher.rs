//! Argon2id-backed implementation of the password hashing port.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version};
use tessera_application::PasswordHasher;
use tessera_core::{AppError, AppResult};

// OWASP password-storage parameters for Argon2id: 19 MiB memory cost,
// two iterations, single lane.
const MEMORY_KIB: u32 = 19_456;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

/// Hashes credentials with Argon2id. Salts are generated per call, so two
/// hashes of the same password never match.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Creates a hasher with the fixed cost parameters above.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn context(&self) -> Argon2<'static> {
        let params =
            Params::new(MEMORY_KIB, ITERATIONS, LANES, None).unwrap_or_else(|_| Params::default());

        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        argon2::PasswordHasher::hash_password(&self.context(), password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| AppError::Internal(format!("password hashing failed: {error}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|error| AppError::Internal(format!("stored hash is malformed: {error}")))?;

        match self.context().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "password verification failed: {error}"
            ))),
        }
    }
}
