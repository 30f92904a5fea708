//! In-memory repository implementations.
//!
//! One [`MemoryDatabase`] holds every table behind a single
//! `tokio::sync::RwLock`, so multi-table invariants (unique email/username,
//! cascade on user delete) hold the same way the PostgreSQL constraints do.
//! The lock is taken per call and never held across another await.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use docspace_core::error::AppError;
use docspace_core::result::AppResult;
use docspace_core::types::{GroupId, SessionId, SpaceId, UserId};
use docspace_entity::group::{Group, GroupRole};
use docspace_entity::permission::{AclEntry, Action, ResourceType, SpaceRoleBinding};
use docspace_entity::resource::ResourceRef;
use docspace_entity::session::Session;
use docspace_entity::user::{CreateUser, User};

use super::{AclRepository, GroupRepository, ResourceRepository, SessionRepository, UserRepository};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    groups: HashMap<GroupId, Group>,
    memberships: HashSet<(GroupId, UserId)>,
    sessions: HashMap<SessionId, Session>,
    acl_entries: Vec<AclEntry>,
    space_bindings: HashMap<(SpaceId, GroupId), GroupRole>,
    resources: HashMap<(ResourceType, Uuid), ResourceRef>,
}

impl Tables {
    fn identifier_taken(&self, email: &str, username: &str) -> bool {
        let email = email.to_lowercase();
        let username = username.to_lowercase();
        self.users
            .values()
            .any(|u| u.email.to_lowercase() == email || u.username.to_lowercase() == username)
    }

    fn user_mut(&mut self, id: UserId) -> AppResult<&mut User> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }
}

/// Process-local tables implementing every repository trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.matches_identifier(identifier))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn exists(&self, email: &str, username: &str) -> AppResult<bool> {
        Ok(self.tables.read().await.identifier_taken(email, username))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&data.id) || tables.identifier_taken(&data.email, &data.username)
        {
            return Err(AppError::conflict("Email or username already registered"));
        }

        let now = Utc::now();
        let user = User {
            id: data.id,
            email: data.email.clone(),
            username: data.username.clone(),
            password_hash: data.password_hash.clone(),
            active: true,
            preferences: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables.user_mut(id)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_preferences(
        &self,
        id: UserId,
        preferences: serde_json::Value,
    ) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let user = tables.user_mut(id)?;
        user.preferences = preferences;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_active(&self, id: UserId, active: bool) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables.user_mut(id)?;
        user.active = active;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.sessions.retain(|_, s| s.user_id != id);
        tables.memberships.retain(|(_, user_id)| *user_id != id);
        tables.acl_entries.retain(|e| e.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl GroupRepository for MemoryDatabase {
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<Group>> {
        let tables = self.tables.read().await;
        let mut groups: Vec<Group> = tables
            .memberships
            .iter()
            .filter(|(_, member)| *member == user_id)
            .filter_map(|(group_id, _)| tables.groups.get(group_id).cloned())
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        role: GroupRole,
    ) -> AppResult<Group> {
        let mut tables = self.tables.write().await;
        if tables.groups.values().any(|g| g.name == name) {
            return Err(AppError::conflict("Group name already exists"));
        }

        let now = Utc::now();
        let group = Group {
            id: GroupId::new(),
            name: name.to_string(),
            description: description.map(str::to_string),
            role,
            created_at: now,
            updated_at: now,
        };
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn add_member(&self, group_id: GroupId, user_id: UserId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.groups.contains_key(&group_id) {
            return Err(AppError::not_found(format!("Group {group_id} not found")));
        }
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        tables.memberships.insert((group_id, user_id));
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MemoryDatabase {
    async fn create(&self, session: &Session) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.sessions.contains_key(&session.id) {
            return Err(AppError::conflict("Session id already in use"));
        }
        if !tables.users.contains_key(&session.user_id) {
            return Err(AppError::internal(format!(
                "Session references unknown user {}",
                session.user_id
            )));
        }
        tables.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: SessionId) -> AppResult<Option<Session>> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn delete(&self, id: SessionId) -> AppResult<bool> {
        Ok(self.tables.write().await.sessions.remove(&id).is_some())
    }

    async fn find_active_by_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Session>> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<Session> = tables
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && !s.is_expired_at(now))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn delete_by_user(&self, user_id: UserId) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - tables.sessions.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}

#[async_trait]
impl AclRepository for MemoryDatabase {
    async fn find_entries(
        &self,
        resource_type: ResourceType,
        resource_id: Uuid,
        user_id: UserId,
        action: Action,
    ) -> AppResult<Vec<AclEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .acl_entries
            .iter()
            .filter(|e| {
                e.resource_type == resource_type
                    && e.resource_id == resource_id
                    && e.user_id == user_id
                    && e.action == action
            })
            .cloned()
            .collect())
    }

    async fn insert_entry(&self, entry: &AclEntry) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.acl_entries.iter().any(|e| e.id == entry.id) {
            return Err(AppError::conflict("ACL entry already exists"));
        }
        tables.acl_entries.push(entry.clone());
        Ok(())
    }

    async fn find_space_bindings(
        &self,
        space_id: SpaceId,
        group_ids: &[GroupId],
    ) -> AppResult<Vec<SpaceRoleBinding>> {
        let tables = self.tables.read().await;
        Ok(group_ids
            .iter()
            .filter_map(|group_id| {
                tables
                    .space_bindings
                    .get(&(space_id, *group_id))
                    .map(|role| SpaceRoleBinding {
                        space_id,
                        group_id: *group_id,
                        role: *role,
                    })
            })
            .collect())
    }

    async fn bind_space_role(&self, binding: &SpaceRoleBinding) -> AppResult<()> {
        self.tables
            .write()
            .await
            .space_bindings
            .insert((binding.space_id, binding.group_id), binding.role);
        Ok(())
    }
}

#[async_trait]
impl ResourceRepository for MemoryDatabase {
    async fn find(&self, resource_type: ResourceType, id: Uuid) -> AppResult<Option<ResourceRef>> {
        Ok(self
            .tables
            .read()
            .await
            .resources
            .get(&(resource_type, id))
            .cloned())
    }

    async fn insert(&self, resource: &ResourceRef, _name: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let key = (resource.resource_type, resource.id);
        if tables.resources.contains_key(&key) {
            return Err(AppError::conflict("Resource already exists"));
        }
        if resource.is_document()
            && !tables
                .resources
                .contains_key(&(ResourceType::Space, resource.space_id.into_uuid()))
        {
            return Err(AppError::not_found(format!(
                "Space {} not found",
                resource.space_id
            )));
        }
        tables.resources.insert(key, resource.clone());
        Ok(())
    }
}
