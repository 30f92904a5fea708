//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use docspace_auth::authenticator::Authenticator;
use docspace_auth::credential::CredentialStore;
use docspace_auth::jwt::{JwtDecoder, JwtEncoder};
use docspace_auth::password::{PasswordHasher, PasswordValidator};
use docspace_auth::rbac::RbacResolver;
use docspace_auth::session::SessionStore;
use docspace_auth::validator::SessionValidator;
use docspace_core::config::AppConfig;
use docspace_core::result::AppResult;
use docspace_database::Repositories;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Repository bundle for the configured backend
    pub repositories: Repositories,
    /// Durable session records
    pub sessions: Arc<SessionStore>,
    /// Login, logout, registration, and session validation
    pub authenticator: Arc<Authenticator>,
    /// Bearer token to request context
    pub validator: Arc<SessionValidator>,
    /// Tiered permission resolution
    pub rbac: Arc<RbacResolver>,
}

impl AppState {
    /// Wire the auth components over `repositories`.
    ///
    /// Fails only if the password hashing parameters are invalid.
    pub fn new(config: AppConfig, repositories: Repositories) -> AppResult<Self> {
        let hasher = Arc::new(PasswordHasher::new(&config.auth.hashing)?);
        let credentials = CredentialStore::new(
            Arc::clone(&repositories.users),
            hasher,
            PasswordValidator::new(&config.auth),
        );

        let sessions = Arc::new(SessionStore::new(Arc::clone(&repositories.sessions)));
        let authenticator = Arc::new(Authenticator::new(
            credentials,
            Arc::clone(&sessions),
            Arc::clone(&repositories.users),
            JwtEncoder::new(&config.auth),
            config.session.ttl(),
        ));

        let validator = Arc::new(SessionValidator::new(
            JwtDecoder::new(&config.auth),
            Arc::clone(&authenticator),
        ));

        let rbac = Arc::new(RbacResolver::new(
            Arc::clone(&repositories.resources),
            Arc::clone(&repositories.acl),
            Arc::clone(&repositories.groups),
        ));

        Ok(Self {
            config: Arc::new(config),
            repositories,
            sessions,
            authenticator,
            validator,
            rbac,
        })
    }
}
