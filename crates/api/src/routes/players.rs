use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use infra::models::PlayerRow;
use infra::pagination::LimitOffset;
use infra::repos::{CreatePlayer, PlayerRepo, UpdatePlayer};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlayerListQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlayerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// GET /api/players
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<PlayerListQuery>,
) -> Result<Json<Vec<PlayerRow>>, AppError> {
    let rows = PlayerRepo::new(state.db.clone())
        .list(q.search, Some(LimitOffset::clamped(q.limit, q.offset)))
        .await?;
    Ok(Json(rows))
}

/// POST /api/players
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerRow>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("invalid email".to_string()));
    }

    let repo = PlayerRepo::new(state.db.clone());
    if repo.get_by_email(&req.email).await?.is_some() {
        return Err(AppError::BadRequest(
            "a player with this email already exists".to_string(),
        ));
    }

    let row = repo
        .create(CreatePlayer {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            phone: req.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/players/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerRow>, AppError> {
    let row = PlayerRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or(AppError::NotFound("player"))?;
    Ok(Json(row))
}

/// PUT /api/players/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePlayerRequest>,
) -> Result<Json<PlayerRow>, AppError> {
    let row = PlayerRepo::new(state.db.clone())
        .update(
            id,
            UpdatePlayer {
                name: req.name,
                phone: req.phone,
            },
        )
        .await?
        .ok_or(AppError::NotFound("player"))?;
    Ok(Json(row))
}

/// DELETE /api/players/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = PlayerRepo::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("player"));
    }
    Ok(StatusCode::NO_CONTENT)
}
