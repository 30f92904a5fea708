//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Additional password strength rules.
    #[serde(default)]
    pub password_policy: PasswordPolicyConfig,
    /// Argon2id cost parameters.
    #[serde(default)]
    pub hashing: PasswordHashingConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            password_min_length: default_password_min(),
            password_policy: PasswordPolicyConfig::default(),
            hashing: PasswordHashingConfig::default(),
        }
    }
}

/// Password strength rules applied on registration and password change.
///
/// When disabled only the minimum length is enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordPolicyConfig {
    /// Require mixed case, digits, symbols, and a minimum zxcvbn score.
    #[serde(default)]
    pub enabled: bool,
    /// Minimum zxcvbn score (0-4).
    #[serde(default = "default_min_score")]
    pub min_score: u8,
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_score: default_min_score(),
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHashingConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for PasswordHashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_password_min() -> usize {
    8
}

fn default_min_score() -> u8 {
    3
}

fn default_memory_kib() -> u32 {
    19_456
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}
