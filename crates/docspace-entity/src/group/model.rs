//! Group entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docspace_core::types::GroupId;

use super::role::GroupRole;

/// A named set of users sharing one role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    /// Unique group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Role granted to every member.
    pub role: GroupRole,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
    /// When the group was last updated.
    pub updated_at: DateTime<Utc>,
}
