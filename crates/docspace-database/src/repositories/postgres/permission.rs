//! ACL entries and space role bindings backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use docspace_core::result::AppResult;
use docspace_core::types::{GroupId, SpaceId, UserId};
use docspace_entity::permission::{AclEntry, Action, ResourceType, SpaceRoleBinding};

use super::{internal, map_db_error};
use crate::repositories::AclRepository;

/// `acl_entries` and `space_role_bindings` access.
#[derive(Debug, Clone)]
pub struct PgAclRepository {
    pool: PgPool,
}

impl PgAclRepository {
    /// Create a new ACL repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AclRepository for PgAclRepository {
    async fn find_entries(
        &self,
        resource_type: ResourceType,
        resource_id: Uuid,
        user_id: UserId,
        action: Action,
    ) -> AppResult<Vec<AclEntry>> {
        sqlx::query_as::<_, AclEntry>(
            "SELECT id, resource_type, resource_id, user_id, action, effect, created_at \
             FROM acl_entries \
             WHERE resource_type = $1 AND resource_id = $2 AND user_id = $3 AND action = $4",
        )
        .bind(resource_type)
        .bind(resource_id)
        .bind(user_id)
        .bind(action)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("Failed to load ACL entries"))
    }

    async fn insert_entry(&self, entry: &AclEntry) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO acl_entries \
             (id, resource_type, resource_id, user_id, action, effect, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(entry.id)
        .bind(entry.resource_type)
        .bind(entry.resource_id)
        .bind(entry.user_id)
        .bind(entry.action)
        .bind(entry.effect)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("Failed to insert ACL entry", "ACL entry already exists"))?;
        Ok(())
    }

    async fn find_space_bindings(
        &self,
        space_id: SpaceId,
        group_ids: &[GroupId],
    ) -> AppResult<Vec<SpaceRoleBinding>> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = group_ids.iter().map(|g| g.into_uuid()).collect();
        sqlx::query_as::<_, SpaceRoleBinding>(
            "SELECT space_id, group_id, role FROM space_role_bindings \
             WHERE space_id = $1 AND group_id = ANY($2)",
        )
        .bind(space_id)
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("Failed to load space role bindings"))
    }

    async fn bind_space_role(&self, binding: &SpaceRoleBinding) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO space_role_bindings (space_id, group_id, role) VALUES ($1, $2, $3) \
             ON CONFLICT (space_id, group_id) DO UPDATE SET role = EXCLUDED.role",
        )
        .bind(binding.space_id)
        .bind(binding.group_id)
        .bind(binding.role)
        .execute(&self.pool)
        .await
        .map_err(internal("Failed to bind space role"))?;
        Ok(())
    }
}
