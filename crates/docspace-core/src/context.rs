//! Request context carrying the authenticated principal and its session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{SessionId, UserId};

/// Context for the current authenticated request.
///
/// Produced by the session validator and handed to handlers through the
/// request extensions, so every operation knows *who* is acting and from
/// *which* session. It lives exactly as long as the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The session the bearer token is bound to.
    pub session_id: SessionId,
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context stamped with the current time.
    pub fn new(
        user_id: UserId,
        session_id: SessionId,
        ip_address: String,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            user_id,
            session_id,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }
}
