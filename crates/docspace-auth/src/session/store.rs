//! Session storage operations wrapping the session repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use docspace_core::error::AppError;
use docspace_core::result::AppResult;
use docspace_core::types::{SessionId, UserId};
use docspace_database::repositories::SessionRepository;
use docspace_entity::session::Session;

/// Durable session records.
///
/// Reads never filter by expiry; deciding whether a session is still
/// usable is the authenticator's job.
#[derive(Clone)]
pub struct SessionStore {
    repo: Arc<dyn SessionRepository>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates a new session store.
    pub fn new(repo: Arc<dyn SessionRepository>) -> Self {
        Self { repo }
    }

    /// Persist a session whose id the caller already chose.
    /// `Conflict` if the id is taken.
    pub async fn create(&self, session: &Session) -> AppResult<()> {
        self.repo.create(session).await
    }

    /// Fetch a session, expired or not. `NotFound` if absent.
    pub async fn get_by_id(&self, id: SessionId) -> AppResult<Session> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))
    }

    /// Remove a session. Deleting an absent session succeeds.
    pub async fn delete(&self, id: SessionId) -> AppResult<()> {
        let removed = self.repo.delete(id).await?;
        debug!(session_id = %id, removed, "Session delete");
        Ok(())
    }

    /// Live sessions of a user, newest first.
    pub async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        self.repo.find_active_by_user(user_id, Utc::now()).await
    }

    /// Remove every session of a user. Returns how many were removed.
    pub async fn delete_for_user(&self, user_id: UserId) -> AppResult<u64> {
        self.repo.delete_by_user(user_id).await
    }

    /// Remove sessions that expired at or before `now`.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.repo.delete_expired(now).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use docspace_core::error::ErrorKind;
    use docspace_database::repositories::UserRepository;
    use docspace_database::repositories::memory::MemoryDatabase;
    use docspace_entity::user::CreateUser;

    use super::*;

    async fn setup() -> (SessionStore, UserId) {
        let db = MemoryDatabase::new();
        let user = UserRepository::create(
            &db,
            &CreateUser {
                id: UserId::new(),
                email: "s@example.com".to_string(),
                username: "s".to_string(),
                password_hash: "x".to_string(),
            },
        )
        .await
        .unwrap();
        (SessionStore::new(Arc::new(db)), user.id)
    }

    #[tokio::test]
    async fn test_get_returns_expired_sessions() {
        let (store, user_id) = setup().await;
        let session = Session::start(
            SessionId::new(),
            user_id,
            None,
            None,
            Utc::now() - Duration::hours(3),
            Duration::hours(1),
        );
        store.create(&session).await.unwrap();

        let loaded = store.get_by_id(session.id).await.unwrap();
        assert!(loaded.is_expired());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (store, user_id) = setup().await;
        let session = Session::start(
            SessionId::new(),
            user_id,
            Some("curl/8".to_string()),
            Some("127.0.0.1".to_string()),
            Utc::now(),
            Duration::hours(1),
        );
        store.create(&session).await.unwrap();

        store.delete(session.id).await.unwrap();
        store.delete(session.id).await.unwrap();

        let err = store.get_by_id(session.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
