pub mod auth;
pub mod config;
pub mod db;
pub mod error;

use std::sync::Arc;
use std::time::Duration;
use actix_web::HttpResponse;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::{Settings, TokenStrategy};

pub use auth::{AuthService, TokenCodec, TokenResponse, UserProfile};
pub use db::{SessionRecord, SessionRepository, User, UserRepository};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Wire the production stack: Postgres repositories and the token
    /// codec selected by configuration. Session rows are only kept in the
    /// shared-secret variant; the RSA variant is stateless. Missing or
    /// unreadable key material fails here, before the server binds.
    pub async fn new(config: Settings) -> Result<Self> {
        let pool = db::connect_pool(
            &config.database.url,
            config.database.max_connections,
            Duration::from_secs(5),
        )
        .await?;

        let users = Arc::new(db::PgUserRepository::new(pool.clone()));
        let sessions: Option<Arc<dyn SessionRepository>> = match config.auth.strategy {
            TokenStrategy::Hmac => Some(Arc::new(db::PgSessionRepository::new(pool.clone()))),
            TokenStrategy::Rsa => None,
        };
        let codec = auth::build_codec(&config.auth)?;

        Ok(Self {
            config: Arc::new(config),
            auth_service: Arc::new(AuthService::new(users, sessions, codec)),
        })
    }
}
