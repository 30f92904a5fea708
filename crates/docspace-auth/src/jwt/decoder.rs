//! JWT verification.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use thiserror::Error;

use docspace_core::config::AuthConfig;
use docspace_core::error::AppError;

use super::claims::Claims;

/// Why a token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not a structurally valid JWT for this service.
    #[error("Malformed token")]
    Malformed,
    /// The signature does not match the signing key.
    #[error("Invalid token signature")]
    SignatureInvalid,
    /// The `exp` claim has passed.
    #[error("Token has expired")]
    Expired,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::expired(err.to_string()),
            TokenError::Malformed | TokenError::SignatureInvalid => {
                AppError::unauthorized(err.to_string())
            }
        }
    }
}

/// Verifies HS256 tokens. A pure function of token, key, and clock.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Check signature and expiry and return the claims.
    ///
    /// The signature is checked before expiry, so a forged expired token
    /// reports `SignatureInvalid`. A token is expired from the instant `exp`
    /// is reached.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                JwtErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            })?;

        // jsonwebtoken only rejects once `exp` is strictly in the past.
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
