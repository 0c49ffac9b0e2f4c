use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use infra::repos::{CreateUser, UserRepo};

use crate::auth::{Claims, PasswordService};
use crate::error::AppError;
use crate::routes::types::ApiUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: ApiUser,
}

/// POST /api/register -- owner self-service signup. The role is always
/// `turf_owner`; admins and staff accounts are provisioned elsewhere.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("invalid email".to_string()));
    }
    PasswordService::validate_password_strength(&req.password)?;

    let repo = UserRepo::new(state.db.clone());
    if repo.get_by_email(&req.email).await?.is_some() {
        return Err(AppError::BadRequest("email already registered".to_string()));
    }

    let user = repo
        .create(CreateUser {
            email: req.email.trim().to_lowercase(),
            password_hash: PasswordService::hash_password(&req.password)?,
            name: req.name.trim().to_string(),
            phone: req.phone,
            role: "turf_owner".to_string(),
            owner_id: None,
        })
        .await?;

    tracing::info!(user_id = %user.id, "owner registered");

    let token = state
        .jwt_service()
        .create_token(user.id, user.email.clone(), user.role.clone())?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let repo = UserRepo::new(state.db.clone());
    let user = repo
        .get_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_string()))?;

    if !PasswordService::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    }
    if !user.is_active {
        return Err(AppError::Unauthorized("account disabled".to_string()));
    }

    let token = state
        .jwt_service()
        .create_token(user.id, user.email.clone(), user.role.clone())?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /api/logout -- tokens are stateless, so this is an acknowledgement
/// the clients use to clear their side.
pub async fn logout() -> Json<Value> {
    Json(json!({ "message": "logged out" }))
}

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiUser>, AppError> {
    let user = UserRepo::new(state.db.clone())
        .get_by_id(claims.user_id()?)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    Ok(Json(user.into()))
}
