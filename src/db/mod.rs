//! Persistence layer: models, repository interfaces and their Postgres and
//! in-memory implementations.

pub mod memory;
pub mod models;
pub mod operations;
pub mod repository;

pub use models::{SessionRecord, User, DEFAULT_ROLE};
pub use operations::{connect_pool, PgSessionRepository, PgUserRepository};
pub use repository::{SessionRepository, UserRepository};
