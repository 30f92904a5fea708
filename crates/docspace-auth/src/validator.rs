//! Per-request bearer token validation.

use std::sync::Arc;

use docspace_core::context::RequestContext;
use docspace_core::error::AppError;
use docspace_core::result::AppResult;

use crate::authenticator::Authenticator;
use crate::jwt::JwtDecoder;

/// Turns an `Authorization` header into a [`RequestContext`].
///
/// Error kinds from the token codec and the authenticator pass through
/// unchanged; the HTTP layer decides how to present them.
#[derive(Debug, Clone)]
pub struct SessionValidator {
    decoder: JwtDecoder,
    authenticator: Arc<Authenticator>,
}

impl SessionValidator {
    /// Creates a new validator.
    pub fn new(decoder: JwtDecoder, authenticator: Arc<Authenticator>) -> Self {
        Self {
            decoder,
            authenticator,
        }
    }

    /// Validate the raw `Authorization` header value.
    ///
    /// `ip_address` and `user_agent` are copied into the context as-is.
    pub async fn validate_bearer(
        &self,
        authorization: Option<&str>,
        ip_address: String,
        user_agent: Option<String>,
    ) -> AppResult<RequestContext> {
        let token = bearer_token(authorization)?;
        let claims = self.decoder.verify(token)?;

        self.authenticator
            .validate_session(claims.session_id(), claims.user_id())
            .await?;

        Ok(RequestContext::new(
            claims.user_id(),
            claims.session_id(),
            ip_address,
            user_agent,
        ))
    }
}

/// Extract the token from `Bearer <token>`. The scheme is case-insensitive.
pub fn bearer_token(authorization: Option<&str>) -> AppResult<&str> {
    let header = authorization.ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;

    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::unauthorized("Unsupported authorization scheme"));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::unauthorized("Missing bearer token"));
    }
    Ok(token)
}
