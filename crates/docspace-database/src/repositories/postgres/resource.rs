//! Space and document lookups backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use docspace_core::result::AppResult;
use docspace_core::types::{SpaceId, UserId};
use docspace_entity::permission::ResourceType;
use docspace_entity::resource::ResourceRef;

use super::{internal, map_db_error};
use crate::repositories::ResourceRepository;

/// `spaces` and `documents` access.
#[derive(Debug, Clone)]
pub struct PgResourceRepository {
    pool: PgPool,
}

impl PgResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository for PgResourceRepository {
    async fn find(&self, resource_type: ResourceType, id: Uuid) -> AppResult<Option<ResourceRef>> {
        let sql = match resource_type {
            ResourceType::Space => "SELECT id, id, owner_id FROM spaces WHERE id = $1",
            ResourceType::Document => "SELECT id, space_id, owner_id FROM documents WHERE id = $1",
        };

        let row = sqlx::query_as::<_, (Uuid, SpaceId, UserId)>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal("Failed to load resource"))?;

        Ok(row.map(|(id, space_id, owner_id)| ResourceRef {
            resource_type,
            id,
            space_id,
            owner_id,
        }))
    }

    async fn insert(&self, resource: &ResourceRef, name: &str) -> AppResult<()> {
        let query = match resource.resource_type {
            ResourceType::Space => {
                sqlx::query("INSERT INTO spaces (id, name, owner_id) VALUES ($1, $2, $3)")
                    .bind(resource.id)
                    .bind(name)
                    .bind(resource.owner_id)
            }
            ResourceType::Document => sqlx::query(
                "INSERT INTO documents (id, space_id, title, owner_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(resource.id)
            .bind(resource.space_id)
            .bind(name)
            .bind(resource.owner_id),
        };

        query
            .execute(&self.pool)
            .await
            .map_err(map_db_error("Failed to insert resource", "Resource already exists"))?;
        Ok(())
    }
}
