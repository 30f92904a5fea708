//! Credential store over the user repository.

use std::sync::Arc;

use tracing::debug;
use validator::ValidateEmail;

use docspace_core::error::{AppError, ErrorKind};
use docspace_core::result::AppResult;
use docspace_core::types::UserId;
use docspace_database::repositories::UserRepository;
use docspace_entity::user::{CreateUser, User};

use crate::password::{PasswordHasher, PasswordValidator};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 64;

/// The only message a failed credential check ever produces.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Input for account creation.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Email address; stored lowercased.
    pub email: String,
    /// Login name.
    pub username: String,
    /// Plaintext password; hashed before storage, never kept.
    pub password: String,
}

/// Verifies passwords and creates accounts.
///
/// Unknown identifier, inactive account, and wrong password are
/// indistinguishable to the caller.
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
    hasher: Arc<PasswordHasher>,
    policy: PasswordValidator,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Creates a new credential store.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<PasswordHasher>,
        policy: PasswordValidator,
    ) -> Self {
        Self {
            users,
            hasher,
            policy,
        }
    }

    /// Check `plaintext` against the account named by `identifier`
    /// (email or username, case-insensitive) and return its id.
    pub async fn verify_password(&self, identifier: &str, plaintext: &str) -> AppResult<UserId> {
        let identifier = identifier.trim();
        if identifier.is_empty() || plaintext.is_empty() {
            return Err(AppError::invalid_input(
                "Identifier and password are required",
            ));
        }

        let user = self.users.find_by_identifier(identifier).await?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let matched = self.check_hash(plaintext, stored_hash).await?;

        match user {
            Some(user) if matched && user.active => Ok(user.id),
            Some(user) => {
                debug!(user_id = %user.id, active = user.active, "Credential check failed");
                Err(AppError::unauthorized(INVALID_CREDENTIALS))
            }
            None => Err(AppError::unauthorized(INVALID_CREDENTIALS)),
        }
    }

    /// Validate and store a new account. Returns its id.
    pub async fn create_user(&self, registration: Registration) -> AppResult<UserId> {
        let email = registration.email.trim().to_lowercase();
        let username = registration.username.trim().to_string();

        validate_email(&email)?;
        validate_username(&username)?;
        self.policy.validate(&registration.password)?;

        if self.users.exists(&email, &username).await? {
            return Err(AppError::conflict("Email or username already registered"));
        }

        let password_hash = self.hash(registration.password).await?;
        let user = self
            .users
            .create(&CreateUser {
                id: UserId::new(),
                email,
                username,
                password_hash,
            })
            .await?;

        Ok(user.id)
    }

    /// Replace the password of `user_id` after confirming `current`.
    ///
    /// A wrong current password is `Unauthorized`.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.find_user(user_id).await?;

        if !self
            .check_hash(current, Some(user.password_hash.clone()))
            .await?
        {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        self.policy.validate_not_same(current, new_password)?;
        self.policy.validate(new_password)?;

        let password_hash = self.hash(new_password.to_string()).await?;
        self.users.update_password(user.id, &password_hash).await
    }

    /// Load a user by id. `NotFound` if absent.
    pub async fn find_user(&self, user_id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// Argon2 is CPU-bound; run it off the async workers.
    async fn check_hash(&self, plaintext: &str, stored: Option<String>) -> AppResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = plaintext.to_string();
        tokio::task::spawn_blocking(move || match stored {
            Some(hash) => hasher.verify_password(&plaintext, &hash),
            None => Ok(hasher.verify_decoy(&plaintext)),
        })
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Password check task failed", e))?
    }

    async fn hash(&self, plaintext: String) -> AppResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash_password(&plaintext))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Password hash task failed", e)
            })?
    }
}

fn validate_email(email: &str) -> AppResult<()> {
    if email.is_empty() {
        return Err(AppError::invalid_input("Email is required"));
    }
    if !email.validate_email() {
        return Err(AppError::invalid_input(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

fn validate_username(username: &str) -> AppResult<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(AppError::invalid_input(format!(
            "Username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(AppError::invalid_input(
            "Username may only contain letters, digits, '.', '_' and '-'",
        ));
    }
    if username.contains('@') {
        return Err(AppError::invalid_input("Username must not contain '@'"));
    }
    Ok(())
}
