//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docspace_auth::authenticator::LoginOutcome;
use docspace_auth::rbac::{AuthorizationDecision, DecisionReason, RuleTier};
use docspace_core::types::{SessionId, UserId};
use docspace_entity::session::Session;
use docspace_entity::user::User;

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token.
    pub token: String,
    /// Session the token is bound to.
    pub session_id: SessionId,
    /// Authenticated user.
    pub user_id: UserId,
    /// Session and token expiration.
    pub expires_at: DateTime<Utc>,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: outcome.token,
            session_id: outcome.session_id,
            user_id: outcome.user_id,
            expires_at: outcome.expires_at,
        }
    }
}

/// Registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// The new user's id.
    pub user_id: UserId,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Token validation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    /// Always `true`; failures are error responses.
    pub valid: bool,
    /// Owner of the session.
    pub user_id: UserId,
    /// The validated session.
    pub session_id: SessionId,
}

/// The caller's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// User ID.
    pub id: UserId,
    /// Email.
    pub email: String,
    /// Username.
    pub username: String,
    /// Account enabled.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// One live session of the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Session ID.
    pub id: SessionId,
    /// User-Agent recorded at login.
    pub user_agent: Option<String>,
    /// Client address recorded at login.
    pub ip_address: Option<String>,
    /// Login time.
    pub created_at: DateTime<Utc>,
    /// Expiration time.
    pub expires_at: DateTime<Utc>,
    /// Whether this is the session making the request.
    pub current: bool,
}

impl SessionResponse {
    /// Builds the response, flagging `current` if it matches `session.id`.
    pub fn from_session(session: Session, current: SessionId) -> Self {
        Self {
            current: session.id == current,
            id: session.id,
            user_agent: session.user_agent,
            ip_address: session.ip_address,
            created_at: session.created_at,
            expires_at: session.expires_at,
        }
    }
}

/// Result of an allowed access check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    /// Always `true`; denials are error responses.
    pub allowed: bool,
    /// Tier that decided.
    pub tier: RuleTier,
    /// Why it decided.
    pub reason: DecisionReason,
}

impl From<AuthorizationDecision> for AccessResponse {
    fn from(decision: AuthorizationDecision) -> Self {
        Self {
            allowed: decision.allowed,
            tier: decision.tier,
            reason: decision.reason,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Active storage backend.
    pub database: String,
    /// Crate version.
    pub version: String,
}
