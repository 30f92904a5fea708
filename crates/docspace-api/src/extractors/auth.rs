//! Bearer extractors: pull the token from the Authorization header, validate
//! it against its session, and hand the handler a [`RequestContext`].

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::headers::{HeaderMapExt, UserAgent};

use docspace_core::context::RequestContext;
use docspace_core::error::{AppError, ErrorKind};

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller for protected routes.
///
/// Any authentication failure becomes `401`; only `Internal` passes through
/// as `500`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = validate(parts, state).await.map_err(|err| match err.kind {
            ErrorKind::Internal | ErrorKind::Unauthorized => err,
            _ => AppError::unauthorized(err.message),
        })?;

        parts.extensions.insert(ctx.clone());
        Ok(AuthUser(ctx))
    }
}

/// Like [`AuthUser`], but the rejection keeps the precise failure kind:
/// an unknown session is `404` and an expired one `401 EXPIRED`.
#[derive(Debug, Clone)]
pub struct BearerSession(pub RequestContext);

impl FromRequestParts<AppState> for BearerSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = validate(parts, state).await?;
        parts.extensions.insert(ctx.clone());
        Ok(BearerSession(ctx))
    }
}

async fn validate(parts: &Parts, state: &AppState) -> Result<RequestContext, AppError> {
    let authorization = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    state
        .validator
        .validate_bearer(
            authorization,
            client_ip(&parts.headers),
            user_agent(&parts.headers),
        )
        .await
}

/// First hop of `X-Forwarded-For`, or `"unknown"`.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// The `User-Agent` header, if present.
pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<UserAgent>()
        .map(|ua| ua.as_str().to_string())
}
