//! Login, registration, logout, and session validation.
//!
//! A principal moves Anonymous -> Authenticated on login and
//! Authenticated -> Revoked on logout or expiry.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{error, warn};

use docspace_core::error::{AppError, ErrorKind};
use docspace_core::events::{AuthEvent, AuthOutcome};
use docspace_core::result::AppResult;
use docspace_core::types::{SessionId, UserId};
use docspace_database::repositories::UserRepository;
use docspace_entity::session::Session;

use crate::credential::{CredentialStore, Registration};
use crate::jwt::JwtEncoder;
use crate::session::SessionStore;

/// Fresh session ids attempted before a login gives up.
pub const MAX_SESSION_ID_ATTEMPTS: u32 = 3;

/// Produces candidate session ids.
pub type SessionIdSource = Arc<dyn Fn() -> SessionId + Send + Sync>;

/// A login request as seen by the authenticator.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    /// Email or username.
    pub identifier: String,
    /// Plaintext password.
    pub password: String,
    /// Client User-Agent, recorded on the session.
    pub user_agent: Option<String>,
    /// Client address, recorded on the session.
    pub ip_address: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    /// Signed bearer token.
    pub token: String,
    /// The authenticated user.
    pub user_id: UserId,
    /// The session the token is bound to.
    pub session_id: SessionId,
    /// When the session (and token) expire.
    pub expires_at: DateTime<Utc>,
}

/// Orchestrates credentials, sessions, and tokens.
#[derive(Clone)]
pub struct Authenticator {
    credentials: CredentialStore,
    sessions: Arc<SessionStore>,
    users: Arc<dyn UserRepository>,
    encoder: JwtEncoder,
    ttl: Duration,
    session_ids: SessionIdSource,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Creates a new authenticator issuing sessions that last `ttl`.
    pub fn new(
        credentials: CredentialStore,
        sessions: Arc<SessionStore>,
        users: Arc<dyn UserRepository>,
        encoder: JwtEncoder,
        ttl: Duration,
    ) -> Self {
        Self {
            credentials,
            sessions,
            users,
            encoder,
            ttl,
            session_ids: Arc::new(SessionId::new),
        }
    }

    /// Replace the session id generator.
    pub fn with_session_id_source(mut self, source: SessionIdSource) -> Self {
        self.session_ids = source;
        self
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The credential store used for password checks.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Verify credentials, open a session, and issue a token for it.
    ///
    /// No session is created unless the credentials check passes, and no
    /// session survives a failed token issuance.
    pub async fn login(&self, attempt: LoginAttempt) -> AppResult<LoginOutcome> {
        let ip_address = attempt.ip_address.clone();
        let result = self.login_inner(attempt).await;

        AuthEvent::Login {
            user_id: result.as_ref().ok().map(|o| o.user_id),
            session_id: result.as_ref().ok().map(|o| o.session_id),
            ip_address,
            outcome: AuthOutcome::of(&result),
        }
        .emit();

        result
    }

    async fn login_inner(&self, attempt: LoginAttempt) -> AppResult<LoginOutcome> {
        let user_id = self
            .credentials
            .verify_password(&attempt.identifier, &attempt.password)
            .await?;

        let session = self
            .open_session(user_id, attempt.user_agent, attempt.ip_address)
            .await?;

        let token = match self
            .encoder
            .issue_at(user_id, session.id, session.created_at, self.ttl)
        {
            Ok(token) => token,
            Err(e) => {
                if let Err(cleanup) = self.sessions.delete(session.id).await {
                    error!(
                        session_id = %session.id,
                        error = %cleanup,
                        "Failed to remove session after token issuance failure"
                    );
                }
                return Err(AppError::with_source(
                    ErrorKind::Internal,
                    "Failed to issue token",
                    e,
                ));
            }
        };

        Ok(LoginOutcome {
            token,
            user_id,
            session_id: session.id,
            expires_at: session.expires_at,
        })
    }

    async fn open_session(
        &self,
        user_id: UserId,
        user_agent: Option<String>,
        ip_address: Option<String>,
    ) -> AppResult<Session> {
        for attempt in 1..=MAX_SESSION_ID_ATTEMPTS {
            let session = Session::start(
                (self.session_ids)(),
                user_id,
                user_agent.clone(),
                ip_address.clone(),
                Utc::now(),
                self.ttl,
            );

            match self.sessions.create(&session).await {
                Ok(()) => return Ok(session),
                Err(e) if e.kind == ErrorKind::Conflict => {
                    warn!(attempt, session_id = %session.id, "Session id collision");
                }
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Internal,
                        "Failed to create session",
                        e,
                    ));
                }
            }
        }

        Err(AppError::internal(format!(
            "No unique session id after {MAX_SESSION_ID_ATTEMPTS} attempts"
        )))
    }

    /// Create an account. Does not log the new user in.
    pub async fn register(&self, registration: Registration) -> AppResult<UserId> {
        let result = self.credentials.create_user(registration).await;
        AuthEvent::Register {
            user_id: result.as_ref().ok().copied(),
            outcome: AuthOutcome::of(&result),
        }
        .emit();
        result
    }

    /// End a session. Ending an unknown session succeeds.
    pub async fn logout(&self, session_id: SessionId) -> AppResult<()> {
        self.sessions.delete(session_id).await?;
        AuthEvent::Logout { session_id }.emit();
        Ok(())
    }

    /// Check that `session_id` exists, belongs to `claimed_user_id`, and has
    /// not expired.
    ///
    /// Errors, in order of checking: `NotFound`, `Unauthorized`, `Expired`.
    pub async fn validate_session(
        &self,
        session_id: SessionId,
        claimed_user_id: UserId,
    ) -> AppResult<Session> {
        self.validate_session_at(session_id, claimed_user_id, Utc::now())
            .await
    }

    /// [`Self::validate_session`] against an explicit clock.
    pub async fn validate_session_at(
        &self,
        session_id: SessionId,
        claimed_user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Session> {
        let result = self
            .sessions
            .get_by_id(session_id)
            .await
            .and_then(|session| {
                if session.user_id != claimed_user_id {
                    Err(AppError::unauthorized(
                        "Session does not belong to this user",
                    ))
                } else if session.is_expired_at(now) {
                    Err(AppError::expired("Session expired"))
                } else {
                    Ok(session)
                }
            });

        AuthEvent::Validate {
            session_id,
            user_id: claimed_user_id,
            outcome: AuthOutcome::of(&result),
        }
        .emit();

        result
    }

    /// Live sessions of a user, newest first.
    pub async fn sessions_for(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        self.sessions.list_for_user(user_id).await
    }

    /// Disable an account and revoke all of its sessions.
    pub async fn deactivate_user(&self, user_id: UserId) -> AppResult<u64> {
        self.users.set_active(user_id, false).await?;
        let count = self.sessions.delete_for_user(user_id).await?;
        AuthEvent::SessionsRevoked { user_id, count }.emit();
        Ok(count)
    }
}
