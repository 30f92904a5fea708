//! Access check: resolve one authorization question for the caller.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use docspace_entity::permission::{Action, ResourceType};

use crate::dto::request::AccessQuery;
use crate::dto::response::AccessResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/v1/access/{resource_type}/{resource_id}?action=
///
/// `200` when allowed, `403` when denied, `404` when the resource is absent
/// and the caller's role would otherwise be able to act on it.
pub async fn check_access(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((resource_type, resource_id)): Path<(String, Uuid)>,
    Query(query): Query<AccessQuery>,
) -> Result<Json<AccessResponse>, ApiError> {
    let resource_type: ResourceType = resource_type.parse()?;
    let action: Action = query.action.parse()?;

    let decision = state
        .rbac
        .authorize(auth.user_id, resource_type, resource_id, action)
        .await?;
    decision.into_result()?;

    Ok(Json(decision.into()))
}
