//! User repository backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use docspace_core::error::AppError;
use docspace_core::result::AppResult;
use docspace_core::types::UserId;
use docspace_entity::user::{CreateUser, User};

use super::{internal, map_db_error};
use crate::repositories::UserRepository;

const USER_COLUMNS: &str =
    "id, email, username, password_hash, active, preferences, created_at, updated_at";

/// Users table access.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE LOWER(email) = LOWER($1) OR LOWER(username) = LOWER($1) \
             LIMIT 1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("Failed to find user by identifier"))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal("Failed to find user"))
    }

    async fn exists(&self, email: &str, username: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users \
             WHERE LOWER(email) = LOWER($1) OR LOWER(username) = LOWER($2))",
        )
        .bind(email)
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(internal("Failed to check user existence"))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, username, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(data.id)
        .bind(&data.email)
        .bind(&data.username)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error(
            "Failed to create user",
            "Email or username already registered",
        ))
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(internal("Failed to update password"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }

    async fn update_preferences(
        &self,
        id: UserId,
        preferences: serde_json::Value,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET preferences = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(preferences)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("Failed to update preferences"))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn set_active(&self, id: UserId, active: bool) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(active)
                .execute(&self.pool)
                .await
                .map_err(internal("Failed to update user status"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal("Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }
}
