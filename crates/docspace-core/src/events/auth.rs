//! Authentication lifecycle events.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::types::id::{SessionId, UserId};

/// Whether the operation an event describes succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthOutcome {
    /// The operation completed.
    Success,
    /// The operation was rejected with the given error kind.
    Failure(ErrorKind),
}

impl AuthOutcome {
    /// Build an outcome from a finished operation's result.
    pub fn of<T, E>(result: &Result<T, E>) -> Self
    where
        E: AsRef<ErrorKind>,
    {
        match result {
            Ok(_) => Self::Success,
            Err(e) => Self::Failure(*e.as_ref()),
        }
    }
}

/// Events related to credentials and sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthEvent {
    /// A login attempt finished.
    Login {
        /// The user, when credentials matched.
        user_id: Option<UserId>,
        /// The session created for the login.
        session_id: Option<SessionId>,
        /// Client address recorded on the session.
        ip_address: Option<String>,
        /// Result of the attempt.
        outcome: AuthOutcome,
    },
    /// A registration attempt finished.
    Register {
        /// The newly created user.
        user_id: Option<UserId>,
        /// Result of the attempt.
        outcome: AuthOutcome,
    },
    /// A session was explicitly ended.
    Logout {
        /// The ended session.
        session_id: SessionId,
    },
    /// A session was checked against a token's claims.
    Validate {
        /// The session referenced by the token.
        session_id: SessionId,
        /// The user the token claims.
        user_id: UserId,
        /// Result of the check.
        outcome: AuthOutcome,
    },
    /// Every session of a user was removed.
    SessionsRevoked {
        /// The affected user.
        user_id: UserId,
        /// Number of removed sessions.
        count: u64,
    },
    /// The sweeper removed expired session rows.
    ExpiredPurged {
        /// Number of removed sessions.
        count: u64,
    },
}

impl AuthEvent {
    /// Stable event name used as the `event` log field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "auth.login",
            Self::Register { .. } => "auth.register",
            Self::Logout { .. } => "auth.logout",
            Self::Validate { .. } => "auth.validate",
            Self::SessionsRevoked { .. } => "auth.sessions_revoked",
            Self::ExpiredPurged { .. } => "auth.expired_purged",
        }
    }

    /// Write the event to the tracing subscriber.
    ///
    /// Failures are logged at `warn`, internal failures at `error`,
    /// everything else at `info`.
    pub fn emit(&self) {
        let event = self.name();
        match self {
            Self::Login {
                user_id,
                session_id,
                ip_address,
                outcome,
            } => match outcome {
                AuthOutcome::Success => tracing::info!(
                    event,
                    user_id = ?user_id.map(|u| u.to_string()),
                    session_id = ?session_id.map(|s| s.to_string()),
                    ip_address = ip_address.as_deref().unwrap_or("-"),
                    "Login succeeded"
                ),
                AuthOutcome::Failure(kind) => log_failure(event, *kind, "Login failed"),
            },
            Self::Register { user_id, outcome } => match outcome {
                AuthOutcome::Success => tracing::info!(
                    event,
                    user_id = ?user_id.map(|u| u.to_string()),
                    "User registered"
                ),
                AuthOutcome::Failure(kind) => log_failure(event, *kind, "Registration rejected"),
            },
            Self::Logout { session_id } => {
                tracing::info!(event, session_id = %session_id, "Session ended")
            }
            Self::Validate {
                session_id,
                user_id,
                outcome,
            } => match outcome {
                AuthOutcome::Success => tracing::debug!(
                    event,
                    session_id = %session_id,
                    user_id = %user_id,
                    "Session valid"
                ),
                AuthOutcome::Failure(kind) => tracing::warn!(
                    event,
                    session_id = %session_id,
                    user_id = %user_id,
                    kind = %kind,
                    "Session rejected"
                ),
            },
            Self::SessionsRevoked { user_id, count } => {
                tracing::info!(event, user_id = %user_id, count, "Sessions revoked")
            }
            Self::ExpiredPurged { count } => {
                tracing::info!(event, count, "Expired sessions purged")
            }
        }
    }
}

fn log_failure(event: &'static str, kind: ErrorKind, message: &'static str) {
    if kind == ErrorKind::Internal {
        tracing::error!(event, kind = %kind, "{message}");
    } else {
        tracing::warn!(event, kind = %kind, "{message}");
    }
}
