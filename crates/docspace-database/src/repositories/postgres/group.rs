//! Group repository backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use docspace_core::result::AppResult;
use docspace_core::types::{GroupId, UserId};
use docspace_entity::group::{Group, GroupRole};

use super::{internal, map_db_error};
use crate::repositories::GroupRepository;

/// Groups and the `user_groups` join table.
#[derive(Debug, Clone)]
pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    /// Create a new group repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<Group>> {
        sqlx::query_as::<_, Group>(
            "SELECT g.id, g.name, g.description, g.role, g.created_at, g.updated_at \
             FROM groups g JOIN user_groups ug ON ug.group_id = g.id \
             WHERE ug.user_id = $1 ORDER BY g.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("Failed to load user groups"))
    }

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        role: GroupRole,
    ) -> AppResult<Group> {
        sqlx::query_as::<_, Group>(
            "INSERT INTO groups (id, name, description, role) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, description, role, created_at, updated_at",
        )
        .bind(GroupId::new())
        .bind(name)
        .bind(description)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Failed to create group", "Group name already exists"))
    }

    async fn add_member(&self, group_id: GroupId, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_groups (group_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(internal("Failed to add group member"))?;
        Ok(())
    }
}
