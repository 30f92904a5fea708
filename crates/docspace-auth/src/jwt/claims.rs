//! JWT claims carried by every bearer token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docspace_core::types::{SessionId, UserId};

/// Token payload. A token is only as good as the session it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: UserId,
    /// Session the token was issued for.
    pub sid: SessionId,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> UserId {
        self.sub
    }

    /// Returns the session ID.
    pub fn session_id(&self) -> SessionId {
        self.sid
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
