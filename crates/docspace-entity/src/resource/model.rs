//! Resource reference model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docspace_core::types::{SpaceId, UserId};

use crate::permission::ResourceType;

/// The parts of a space or document that authorization needs.
///
/// For a space `space_id` equals `id`; for a document it is the owning space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Kind of resource.
    pub resource_type: ResourceType,
    /// The resource id.
    pub id: Uuid,
    /// The space the resource lives in.
    pub space_id: SpaceId,
    /// The creating user.
    pub owner_id: UserId,
}

impl ResourceRef {
    /// Reference to a space.
    pub fn space(id: SpaceId, owner_id: UserId) -> Self {
        Self {
            resource_type: ResourceType::Space,
            id: id.into_uuid(),
            space_id: id,
            owner_id,
        }
    }

    /// Reference to a document inside `space_id`.
    pub fn document(id: Uuid, space_id: SpaceId, owner_id: UserId) -> Self {
        Self {
            resource_type: ResourceType::Document,
            id,
            space_id,
            owner_id,
        }
    }

    /// Whether this is a document (and so has a distinct parent space).
    pub fn is_document(&self) -> bool {
        self.resource_type == ResourceType::Document
    }
}
