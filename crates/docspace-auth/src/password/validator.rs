//! Password policy enforcement for new passwords.

use docspace_core::config::AuthConfig;
use docspace_core::error::AppError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    strict: bool,
    min_score: u8,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            strict: config.password_policy.enabled,
            min_score: config.password_policy.min_score,
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns the first violation as an `InvalidInput` error.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !self.strict {
            return Ok(());
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::invalid_input(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::invalid_input(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::invalid_input(
                "Password must contain at least one digit",
            ));
        }

        if !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err(AppError::invalid_input(
                "Password must contain at least one special character",
            ));
        }

        let estimate = zxcvbn::zxcvbn(password, &[]);
        if estimate.score() < score_floor(self.min_score) {
            return Err(AppError::invalid_input(
                "Password is too weak. Please use a stronger password with more entropy.",
            ));
        }

        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(&self, old_password: &str, new_password: &str) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::invalid_input(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}

fn score_floor(min_score: u8) -> zxcvbn::Score {
    match min_score {
        0 => zxcvbn::Score::Zero,
        1 => zxcvbn::Score::One,
        2 => zxcvbn::Score::Two,
        3 => zxcvbn::Score::Three,
        _ => zxcvbn::Score::Four,
    }
}
