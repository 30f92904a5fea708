//! JWT issuance.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use docspace_core::config::AuthConfig;
use docspace_core::error::{AppError, ErrorKind};
use docspace_core::types::{SessionId, UserId};

use super::claims::Claims;

/// Signs HS256 tokens with the process-wide secret.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Issue a token for `session_id` valid for `ttl` from now.
    pub fn issue(&self, user_id: UserId, session_id: SessionId, ttl: Duration) -> Result<String, AppError> {
        self.issue_at(user_id, session_id, Utc::now(), ttl)
    }

    /// Issue a token as if the current time were `issued_at`.
    ///
    /// Login uses the session's `created_at` so token and session share one
    /// expiry instant.
    pub fn issue_at(
        &self,
        user_id: UserId,
        session_id: SessionId,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            sid: session_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to sign token", e)
        })
    }
}
