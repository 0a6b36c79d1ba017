use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenCodec;
use crate::db::models::{SessionRecord, User};
use crate::db::repository::{SessionRepository, UserRepository};
use crate::error::{AppError, AuthError, DatabaseError};

/// Public view of a user. The password hash never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    // Present only in the shared-secret variant; stateless deployments
    // carry no session store at all.
    sessions: Option<Arc<dyn SessionRepository>>,
    tokens: Arc<dyn TokenCodec>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Option<Arc<dyn SessionRepository>>,
        tokens: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            users,
            sessions,
            tokens,
        }
    }

    /// Create an account. The email check runs before the username check,
    /// so when both collide the caller sees `DuplicateEmail`. The role is
    /// always `"customer"`; nothing in the request can set it.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AppError> {
        validate_registration(username, email, password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateEmail.into());
        }
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::DuplicateUsername.into());
        }

        let password_hash = hash_password(password)?;
        let user = User::new(username.to_string(), email.to_string(), password_hash);

        // The pre-checks above race against concurrent inserts; the
        // database constraint is the authority. Translate its violation
        // back into the same duplicate errors.
        let created = match self.users.create(&user).await {
            Ok(created) => created,
            Err(DatabaseError::Duplicate(constraint)) => {
                return Err(if constraint.contains("username") {
                    AuthError::DuplicateUsername.into()
                } else {
                    AuthError::DuplicateEmail.into()
                });
            }
            Err(e) => return Err(e.into()),
        };

        Ok(UserProfile::from(&created))
    }

    /// Exchange credentials for a bearer token. An unknown email and a
    /// wrong password produce the same error, so callers cannot probe
    /// which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AppError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => return Err(AuthError::InvalidCredentials.into()),
        };

        let issued = self.tokens.issue(user.id, &user.role)?;

        if let Some(sessions) = &self.sessions {
            let record = SessionRecord::new(user.id, issued.token.clone(), issued.expires_at);
            sessions.create(&record).await?;
        }

        Ok(TokenResponse {
            access_token: issued.token,
            token_type: "bearer".to_string(),
        })
    }

    /// Resolve a bearer token to the profile it was issued for. A token
    /// that verifies but names a vanished account yields `UserNotFound`,
    /// deliberately distinct from `InvalidCredentials`.
    pub async fn authenticate(&self, token: &str) -> Result<UserProfile, AppError> {
        let claims = self.tokens.validate(token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::from(AuthError::InvalidCredentials))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserProfile::from(&user))
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), AppError> {
    if username.is_empty() || username.len() > 50 {
        return Err(AppError::ValidationError(
            "username must be 1-50 characters".to_string(),
        ));
    }
    if !valid_email(email) {
        return Err(AppError::ValidationError("invalid email address".to_string()));
    }
    if password.is_empty() {
        return Err(AppError::ValidationError("password must not be empty".to_string()));
    }
    Ok(())
}

fn valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::HmacTokenCodec;
    use async_trait::async_trait;
    use chrono::Duration;
    use mockall::mock;

    mock! {
        Users {}

        #[async_trait]
        impl UserRepository for Users {
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
            async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
            async fn create(&self, user: &User) -> Result<User, DatabaseError>;
        }
    }

    fn service_with(users: MockUsers) -> AuthService {
        AuthService::new(
            Arc::new(users),
            None,
            Arc::new(HmacTokenCodec::new(b"test_secret", Duration::minutes(60))),
        )
    }

    // A concurrent insert can slip past the pre-checks; the constraint
    // violation must still surface as the right duplicate error.
    #[tokio::test]
    async fn insert_race_maps_constraint_to_duplicate_email() {
        let mut users = MockUsers::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_create()
            .returning(|_| Err(DatabaseError::Duplicate("users_email_key".to_string())));

        let service = service_with(users);
        match service.register("alice", "a@x.com", "pw").await {
            Err(AppError::AuthError(AuthError::DuplicateEmail)) => {}
            other => panic!("expected duplicate email, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn insert_race_maps_constraint_to_duplicate_username() {
        let mut users = MockUsers::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_create()
            .returning(|_| Err(DatabaseError::Duplicate("users_username_key".to_string())));

        let service = service_with(users);
        match service.register("alice", "a@x.com", "pw").await {
            Err(AppError::AuthError(AuthError::DuplicateUsername)) => {}
            other => panic!("expected duplicate username, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn registration_input_is_validated() {
        let service = service_with(MockUsers::new());

        let too_long = "x".repeat(51);
        for (username, email, password) in [
            ("", "a@x.com", "pw"),
            (too_long.as_str(), "a@x.com", "pw"),
            ("alice", "not-an-email", "pw"),
            ("alice", "@x.com", "pw"),
            ("alice", "a@x.com", ""),
        ] {
            match service.register(username, email, password).await {
                Err(AppError::ValidationError(_)) => {}
                other => panic!(
                    "expected validation error for {:?}, got {:?}",
                    (username, email, password),
                    other
                ),
            }
        }
    }
}
