use actix_web::{web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::auth::CurrentUser;
use crate::db::UserProfile;
use crate::{AppState, Result};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    info!("Received registration request for username: {}", req.username);

    match state.auth_service.register(&req.username, &req.email, &req.password).await {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "User registered successfully"
        }))),
        Err(e) => {
            if e.status_code().is_server_error() {
                error!("Registration failed for username: {}: {}", req.username, e);
            } else {
                warn!("Registration rejected for username: {}: {}", req.username, e);
            }
            Err(e)
        }
    }
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    info!("Received login request for username: {}", req.username);

    let (token, user) = state.auth_service.login(&req.username, &req.password).await?;
    info!("Login successful for username: {}", req.username);

    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}

pub async fn me(current_user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(current_user.profile())
}
