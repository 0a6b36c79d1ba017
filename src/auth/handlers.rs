use actix_web::{web, HttpResponse, HttpRequest};
use serde::Deserialize;
use crate::AppState;
use crate::error::{AppError, AuthError};
use tracing::{info, error};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for email: {}", req.email);
    match state
        .auth_service
        .register(&req.username, &req.email, &req.password)
        .await
    {
        Ok(profile) => {
            info!("Registration successful for email: {}", req.email);
            Ok(HttpResponse::Created().json(profile))
        }
        Err(e) => {
            error!("Registration failed for email: {}: {}", req.email, e);
            Err(e)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    // The original wire form labeled this field "username" while matching
    // it against the email column. The lookup stays email-based.
    pub email: String,
    pub password: String,
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for email: {}", req.email);
    match state.auth_service.login(&req.email, &req.password).await {
        Ok(token) => {
            info!("Login successful for email: {}", req.email);
            Ok(HttpResponse::Ok().json(token))
        }
        Err(e) => {
            error!("Login failed for email: {}: {}", req.email, e);
            Err(e)
        }
    }
}

pub async fn profile(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    // Get token from Authorization header
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AuthError::InvalidCredentials)?;

    let profile = state.auth_service.authenticate(token).await?;
    Ok(HttpResponse::Ok().json(profile))
}
