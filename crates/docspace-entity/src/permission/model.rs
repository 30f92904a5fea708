//! ACL entry and space role binding models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use docspace_core::types::{AclEntryId, GroupId, SpaceId, UserId};

use super::action::Action;
use crate::group::GroupRole;

/// Kind of resource a rule refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// A space (top-level container).
    Space,
    /// A document inside a space.
    Document,
}

impl ResourceType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Document => "document",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = docspace_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "space" | "spaces" => Ok(Self::Space),
            "document" | "documents" => Ok(Self::Document),
            _ => Err(docspace_core::AppError::invalid_input(format!(
                "Invalid resource type: '{s}'. Expected 'space' or 'document'"
            ))),
        }
    }
}

/// Whether an ACL entry grants or revokes the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "acl_effect", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AclEffect {
    /// Grant the action.
    Allow,
    /// Refuse the action. Beats any allow.
    Deny,
}

/// Explicit per-resource rule for one user and one action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AclEntry {
    /// Unique entry identifier.
    pub id: AclEntryId,
    /// Kind of resource.
    pub resource_type: ResourceType,
    /// The space or document id.
    pub resource_id: Uuid,
    /// The user the rule applies to.
    pub user_id: UserId,
    /// The governed action.
    pub action: Action,
    /// Allow or deny.
    pub effect: AclEffect,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

/// A group's role within one space.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpaceRoleBinding {
    /// The space.
    pub space_id: SpaceId,
    /// The group.
    pub group_id: GroupId,
    /// Role the group's members hold in the space.
    pub role: GroupRole,
}
