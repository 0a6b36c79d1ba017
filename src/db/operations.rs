use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::db::models::{SessionRecord, User};
use crate::db::repository::{SessionRepository, UserRepository};
use crate::error::DatabaseError;

fn map_query_err(err: sqlx::Error) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DatabaseError::Duplicate(db.constraint().unwrap_or("unique").to_string())
        }
        sqlx::Error::PoolTimedOut => DatabaseError::ConnectionError(err.to_string()),
        _ => DatabaseError::QueryError(err.to_string()),
    }
}

pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_query_err)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at, updated_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_query_err)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, role, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_query_err)
    }

    async fn create(&self, user: &User) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_query_err)
    }
}

pub struct PgSessionRepository {
    pool: Arc<PgPool>,
}

impl PgSessionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, session: &SessionRecord) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, session_token, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.session_token)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(map_query_err)?;

        Ok(())
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM sessions WHERE session_token = $1")
            .bind(token)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_query_err)?;

        Ok(())
    }
}

/// Open the shared connection pool used by both repositories.
pub async fn connect_pool(
    url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<Arc<PgPool>, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(url)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    Ok(Arc::new(pool))
}
