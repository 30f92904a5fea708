//! Self-service handlers for the authenticated caller.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use validator::Validate;

use docspace_core::error::AppError;

use crate::dto::request::ChangePasswordRequest;
use crate::dto::response::{MessageResponse, ProfileResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/v1/me/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state
        .authenticator
        .credentials()
        .find_user(auth.user_id)
        .await?;
    Ok(Json(user.into()))
}

/// GET /api/v1/me/preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .authenticator
        .credentials()
        .find_user(auth.user_id)
        .await?;
    Ok(Json(user.preferences))
}

/// PUT /api/v1/me/preferences
///
/// Replaces the whole preference object.
pub async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(preferences) = payload?;
    if !preferences.is_object() {
        return Err(AppError::invalid_input("Preferences must be a JSON object").into());
    }

    let user = state
        .repositories
        .users
        .update_preferences(auth.user_id, preferences)
        .await?;
    Ok(Json(user.preferences))
}

/// PUT /api/v1/me/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    state
        .authenticator
        .credentials()
        .change_password(auth.user_id, &req.current_password, &req.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// GET /api/v1/me/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SessionResponse>>, ApiError> {
    let sessions = state.authenticator.sessions_for(auth.user_id).await?;
    Ok(Json(
        sessions
            .into_iter()
            .map(|s| SessionResponse::from_session(s, auth.session_id))
            .collect(),
    ))
}
