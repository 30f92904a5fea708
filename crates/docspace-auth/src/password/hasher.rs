//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use docspace_core::config::PasswordHashingConfig;
use docspace_core::error::{AppError, ErrorKind};

/// Hashes and verifies passwords with Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    /// Hash of a random secret, verified when no user matched so the miss
    /// path costs the same as a mismatch.
    decoy_hash: String,
}

impl PasswordHasher {
    /// Creates a hasher with the configured cost parameters.
    pub fn new(config: &PasswordHashingConfig) -> Result<Self, AppError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| {
                AppError::configuration(format!("Invalid Argon2 parameters: {e}"))
            })?;

        let mut hasher = Self {
            params,
            decoy_hash: String::new(),
        };
        let decoy_secret = SaltString::generate(&mut OsRng);
        hasher.decoy_hash = hasher.hash_password(decoy_secret.as_str())?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Verifies a plaintext password against a stored PHC hash string.
    ///
    /// The comparison inside argon2 is constant-time. Returns `Ok(false)` on
    /// mismatch and an error only for an unparsable stored hash.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Stored password hash is corrupt", e)
        })?;

        // Parameters come from the stored hash, so old hashes keep verifying
        // after a cost change.
        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    /// Burn one verification against the decoy hash. Always `false`.
    pub fn verify_decoy(&self, password: &str) -> bool {
        self.verify_password(password, &self.decoy_hash)
            .unwrap_or(false)
    }
}
