//! Request DTOs with validation.
//!
//! Missing fields deserialize as empty strings so that they are reported as
//! `400 INVALID_INPUT` by validation rather than rejected by the JSON
//! extractor.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    /// Email or username.
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Username.
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Password change request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    /// New password.
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Query string of the access check route.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessQuery {
    /// `list`, `read`, `write`, `delete`, or `manage`.
    pub action: String,
}
