//! Repository traits and the backend bundle.
//!
//! The auth core only sees these traits. Two implementations exist:
//! - PostgreSQL via `sqlx` ([`postgres`])
//! - In-memory tables behind a `tokio::sync::RwLock` ([`memory`])

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use docspace_core::config::{DatabaseConfig, DatabaseProvider};
use docspace_core::result::AppResult;
use docspace_core::types::{GroupId, SessionId, SpaceId, UserId};
use docspace_entity::group::{Group, GroupRole};
use docspace_entity::permission::{AclEntry, Action, ResourceType, SpaceRoleBinding};
use docspace_entity::resource::ResourceRef;
use docspace_entity::session::Session;
use docspace_entity::user::{CreateUser, User};

use crate::connection::DatabasePool;

/// User lookup and persistence.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Find a user whose email or username equals `identifier`, ignoring case.
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Whether any user already holds `email` or `username`, ignoring case.
    async fn exists(&self, email: &str, username: &str) -> AppResult<bool>;

    /// Insert a user. `Conflict` if email or username is taken.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Replace the stored password hash.
    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()>;

    /// Replace the preference blob and return the updated user.
    async fn update_preferences(&self, id: UserId, preferences: serde_json::Value)
    -> AppResult<User>;

    /// Enable or disable the account.
    async fn set_active(&self, id: UserId, active: bool) -> AppResult<()>;

    /// Hard-delete a user, cascading to sessions and memberships.
    /// Returns `true` if a row was removed.
    async fn delete(&self, id: UserId) -> AppResult<bool>;
}

/// Group membership lookup.
#[async_trait]
pub trait GroupRepository: Send + Sync + 'static {
    /// All groups the user belongs to.
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<Group>>;

    /// Create a group.
    async fn create(&self, name: &str, description: Option<&str>, role: GroupRole)
    -> AppResult<Group>;

    /// Add a user to a group. Adding an existing member is a no-op.
    async fn add_member(&self, group_id: GroupId, user_id: UserId) -> AppResult<()>;
}

/// Session persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Insert a session with its pre-assigned id. `Conflict` on id collision.
    async fn create(&self, session: &Session) -> AppResult<()>;

    /// Find a session by id, expired or not.
    async fn find_by_id(&self, id: SessionId) -> AppResult<Option<Session>>;

    /// Delete a session. Returns `true` if a row was removed.
    async fn delete(&self, id: SessionId) -> AppResult<bool>;

    /// Sessions of `user_id` still live at `now`, newest first.
    async fn find_active_by_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Session>>;

    /// Delete every session of `user_id`. Returns the number removed.
    async fn delete_by_user(&self, user_id: UserId) -> AppResult<u64>;

    /// Delete sessions with `expires_at <= now`. Returns the number removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Per-resource ACL entries and space role bindings.
#[async_trait]
pub trait AclRepository: Send + Sync + 'static {
    /// Entries for exactly this resource, user, and action.
    async fn find_entries(
        &self,
        resource_type: ResourceType,
        resource_id: Uuid,
        user_id: UserId,
        action: Action,
    ) -> AppResult<Vec<AclEntry>>;

    /// Insert an ACL entry.
    async fn insert_entry(&self, entry: &AclEntry) -> AppResult<()>;

    /// Role bindings on `space_id` for any of `group_ids`.
    async fn find_space_bindings(
        &self,
        space_id: SpaceId,
        group_ids: &[GroupId],
    ) -> AppResult<Vec<SpaceRoleBinding>>;

    /// Bind a group to a space with a role, replacing any previous binding.
    async fn bind_space_role(&self, binding: &SpaceRoleBinding) -> AppResult<()>;
}

/// Read access to spaces and documents for authorization.
#[async_trait]
pub trait ResourceRepository: Send + Sync + 'static {
    /// Resolve a resource reference, or `None` if it does not exist.
    async fn find(&self, resource_type: ResourceType, id: Uuid) -> AppResult<Option<ResourceRef>>;

    /// Register a space or document under `name`.
    async fn insert(&self, resource: &ResourceRef, name: &str) -> AppResult<()>;
}

/// The set of repositories wired for one backend.
#[derive(Clone)]
pub struct Repositories {
    /// Users.
    pub users: Arc<dyn UserRepository>,
    /// Groups and memberships.
    pub groups: Arc<dyn GroupRepository>,
    /// Sessions.
    pub sessions: Arc<dyn SessionRepository>,
    /// ACL entries and space bindings.
    pub acl: Arc<dyn AclRepository>,
    /// Spaces and documents.
    pub resources: Arc<dyn ResourceRepository>,
    /// The pool, when backed by PostgreSQL.
    pub pool: Option<DatabasePool>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories")
            .field("backend", &self.backend())
            .finish()
    }
}

impl Repositories {
    /// Repositories over a PostgreSQL pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(postgres::PgUserRepository::new(pg.clone())),
            groups: Arc::new(postgres::PgGroupRepository::new(pg.clone())),
            sessions: Arc::new(postgres::PgSessionRepository::new(pg.clone())),
            acl: Arc::new(postgres::PgAclRepository::new(pg.clone())),
            resources: Arc::new(postgres::PgResourceRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Repositories over one shared set of in-memory tables.
    pub fn memory() -> Self {
        let db = memory::MemoryDatabase::new();
        Self {
            users: Arc::new(db.clone()),
            groups: Arc::new(db.clone()),
            sessions: Arc::new(db.clone()),
            acl: Arc::new(db.clone()),
            resources: Arc::new(db),
            pool: None,
        }
    }

    /// Build the backend named by `config.provider`, connecting if needed.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    crate::migration::run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            DatabaseProvider::Memory => {
                tracing::warn!("Using in-memory repositories; state is lost on restart");
                Ok(Self::memory())
            }
        }
    }

    /// Name of the active backend.
    pub fn backend(&self) -> DatabaseProvider {
        if self.pool.is_some() {
            DatabaseProvider::Postgres
        } else {
            DatabaseProvider::Memory
        }
    }

    /// Whether the backing store answers. Always `true` for memory.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }
}
