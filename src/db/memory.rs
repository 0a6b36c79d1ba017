//! In-memory repositories backed by a `HashMap` behind `tokio::sync::RwLock`.
//! Used by the integration tests and for running the service without a
//! database. They enforce the same uniqueness rules as the Postgres schema
//! and report violations under the same constraint names.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{SessionRecord, User};
use crate::db::repository::{SessionRepository, UserRepository};
use crate::error::DatabaseError;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: drop a user record, simulating an account deleted after
    /// a token was issued for it.
    pub async fn remove(&self, id: Uuid) -> Option<User> {
        self.users.write().await.remove(&id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, user: &User) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::Duplicate("users_email_key".to_string()));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::Duplicate("users_username_key".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<Vec<SessionRecord>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_by_token(&self, token: &str) -> Option<SessionRecord> {
        let sessions = self.sessions.read().await;
        sessions.iter().find(|s| s.session_token == token).cloned()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &SessionRecord) -> Result<(), DatabaseError> {
        self.sessions.write().await.push(session.clone());
        Ok(())
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), DatabaseError> {
        self.sessions.write().await.retain(|s| s.session_token != token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn create_rejects_duplicate_email_then_username() {
        let repo = InMemoryUserRepository::new();
        let alice = User::new("alice".into(), "a@x.com".into(), "hash".into());
        repo.create(&alice).await.unwrap();

        let same_email = User::new("bob".into(), "a@x.com".into(), "hash".into());
        match repo.create(&same_email).await {
            Err(DatabaseError::Duplicate(c)) => assert_eq!(c, "users_email_key"),
            other => panic!("expected duplicate email, got {:?}", other),
        }

        let same_username = User::new("alice".into(), "b@x.com".into(), "hash".into());
        match repo.create(&same_username).await {
            Err(DatabaseError::Duplicate(c)) => assert_eq!(c, "users_username_key"),
            other => panic!("expected duplicate username, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn sessions_can_be_deleted_by_token() {
        let repo = InMemorySessionRepository::new();
        let record = SessionRecord::new(
            Uuid::new_v4(),
            "some.token".to_string(),
            Utc::now() + Duration::minutes(60),
        );
        repo.create(&record).await.unwrap();
        assert!(repo.find_by_token("some.token").await.is_some());

        repo.delete_by_token("some.token").await.unwrap();
        assert!(repo.find_by_token("some.token").await.is_none());
        assert_eq!(repo.count().await, 0);
    }
}
