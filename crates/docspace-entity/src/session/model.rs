//! Session entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docspace_core::types::{SessionId, UserId};

/// A server-side login session.
///
/// Created on login with `expires_at = created_at + TTL`, deleted on logout.
/// A row past `expires_at` may still exist until the sweeper removes it but
/// is treated as expired by every reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unguessable session identifier.
    pub id: SessionId,
    /// The user this session belongs to.
    pub user_id: UserId,
    /// User-Agent header at login. Informational only.
    pub user_agent: Option<String>,
    /// Client address at login. Informational only.
    pub ip_address: Option<String>,
    /// Absolute expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Login time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Build a new session starting at `now` and lasting `ttl`.
    pub fn start(
        id: SessionId,
        user_id: UserId,
        user_agent: Option<String>,
        ip_address: Option<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id,
            user_id,
            user_agent,
            ip_address,
            expires_at: now + ttl,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the session is dead at `now`. The boundary instant counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Seconds until expiry, or zero if already expired.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_sets_expiry_from_ttl() {
        let now = Utc::now();
        let session = Session::start(
            SessionId::new(),
            UserId::new(),
            None,
            None,
            now,
            Duration::minutes(30),
        );
        assert_eq!(session.expires_at - session.created_at, Duration::minutes(30));
        assert_eq!(session.remaining_seconds(now), 1800);
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let now = Utc::now();
        let session = Session::start(
            SessionId::new(),
            UserId::new(),
            None,
            None,
            now,
            Duration::seconds(10),
        );
        assert!(!session.is_expired_at(now + Duration::seconds(9)));
        assert!(session.is_expired_at(now + Duration::seconds(10)));
        assert_eq!(session.remaining_seconds(now + Duration::seconds(20)), 0);
    }
}
