use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{SessionRecord, User};
use crate::error::DatabaseError;

/// Storage interface for user records. `create` must rely on storage-level
/// uniqueness constraints: the pre-checks in the service are only a
/// fast path, and a concurrent insert surfaces as
/// `DatabaseError::Duplicate` with the violated constraint name.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn create(&self, user: &User) -> Result<User, DatabaseError>;
}

/// Storage interface for session records (shared-secret variant).
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &SessionRecord) -> Result<(), DatabaseError>;

    /// Revocation hook. Nothing in the validation path calls this yet;
    /// removing a row does not invalidate the token itself.
    async fn delete_by_token(&self, token: &str) -> Result<(), DatabaseError>;
}
