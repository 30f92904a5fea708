//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docspace_core::types::UserId;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique email address.
    pub email: String,
    /// Unique login name.
    pub username: String,
    /// Argon2id PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Disabled users cannot log in.
    pub active: bool,
    /// Free-form UI preferences.
    pub preferences: serde_json::Value,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether `identifier` names this user by email or username.
    ///
    /// Comparison folds Unicode case, as `LOWER()` does in Postgres.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        let identifier = identifier.to_lowercase();
        self.email.to_lowercase() == identifier || self.username.to_lowercase() == identifier
    }
}

/// Data required to insert a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Pre-assigned identifier.
    pub id: UserId,
    /// Normalized email address.
    pub email: String,
    /// Login name.
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            password_hash: "$argon2id$...".to_string(),
            active: true,
            preferences: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_matches_email_or_username_case_insensitively() {
        let user = user();
        assert!(user.matches_identifier("alice"));
        assert!(user.matches_identifier("ALICE@example.com"));
        assert!(!user.matches_identifier("bob"));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(user()).expect("serialize");
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
