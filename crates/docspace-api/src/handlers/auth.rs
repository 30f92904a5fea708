//! Auth handlers: login, register, logout, validate.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use validator::Validate;

use docspace_auth::authenticator::LoginAttempt;
use docspace_auth::credential::Registration;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{LoginResponse, MessageResponse, RegisterResponse, ValidateResponse};
use crate::error::ApiError;
use crate::extractors::auth::{client_ip, user_agent};
use crate::extractors::{AuthUser, BearerSession};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let outcome = state
        .authenticator
        .login(LoginAttempt {
            identifier: req.identifier,
            password: req.password,
            user_agent: user_agent(&headers),
            ip_address: Some(client_ip(&headers)),
        })
        .await?;

    Ok(Json(outcome.into()))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let user_id = state
        .authenticator
        .register(Registration {
            email: req.email,
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

/// GET /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.authenticator.logout(auth.session_id).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// GET /api/auth/validate
pub async fn validate(BearerSession(ctx): BearerSession) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        valid: true,
        user_id: ctx.user_id,
        session_id: ctx.session_id,
    })
}
