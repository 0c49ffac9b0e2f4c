use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use infra::pagination::LimitOffset;
use infra::repos::{CreateUser, UpdateUser, UserFilter, UserRepo};

use crate::auth::{Actor, Claims, PasswordService};
use crate::error::AppError;
use crate::routes::types::ApiUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OwnerListQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOwnerRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOwnerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

/// GET /api/turf-owners (super_admin)
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<OwnerListQuery>,
) -> Result<Json<Vec<ApiUser>>, AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;

    let rows = UserRepo::new(state.db.clone())
        .list(
            UserFilter {
                search: q.search,
                role: Some("turf_owner".to_string()),
                is_active: q.is_active,
            },
            Some(LimitOffset::clamped(q.limit, q.offset)),
        )
        .await?;

    Ok(Json(rows.into_iter().map(ApiUser::from).collect()))
}

/// POST /api/turf-owners (super_admin)
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateOwnerRequest>,
) -> Result<(StatusCode, Json<ApiUser>), AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;

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

    let row = repo
        .create(CreateUser {
            email: req.email.trim().to_lowercase(),
            password_hash: PasswordService::hash_password(&req.password)?,
            name: req.name.trim().to_string(),
            phone: req.phone,
            role: "turf_owner".to_string(),
            owner_id: None,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// GET /api/turf-owners/{id} (super_admin)
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiUser>, AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;

    let row = fetch_owner(&state, id).await?;
    Ok(Json(row.into()))
}

/// PUT /api/turf-owners/{id} (super_admin)
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOwnerRequest>,
) -> Result<Json<ApiUser>, AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;
    fetch_owner(&state, id).await?;

    let password_hash = match &req.password {
        Some(password) => {
            PasswordService::validate_password_strength(password)?;
            Some(PasswordService::hash_password(password)?)
        }
        None => None,
    };

    let row = UserRepo::new(state.db.clone())
        .update(
            id,
            UpdateUser {
                name: req.name,
                phone: req.phone,
                password_hash,
                is_active: req.is_active,
            },
        )
        .await?
        .ok_or(AppError::NotFound("turf owner"))?;

    Ok(Json(row.into()))
}

/// DELETE /api/turf-owners/{id} (super_admin) -- cascades to the owner's
/// turfs, staff and subscriptions at the schema level.
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;
    fetch_owner(&state, id).await?;

    UserRepo::new(state.db.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_owner(state: &AppState, id: Uuid) -> Result<infra::models::UserRow, AppError> {
    let row = UserRepo::new(state.db.clone())
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound("turf owner"))?;
    if row.role != "turf_owner" {
        return Err(AppError::NotFound("turf owner"));
    }
    Ok(row)
}
