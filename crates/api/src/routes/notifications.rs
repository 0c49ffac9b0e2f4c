use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use infra::models::NotificationRow;
use infra::pagination::LimitOffset;
use infra::repos::NotificationRepo;

use crate::auth::{Actor, Claims};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/notifications -- the caller's own feed.
pub async fn list_own(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<NotificationListQuery>,
) -> Result<Json<Vec<NotificationRow>>, AppError> {
    let actor = Actor::from_claims(&claims)?;

    let rows = NotificationRepo::new(state.db.clone())
        .list_for_user(actor.user_id, Some(LimitOffset::clamped(q.limit, q.offset)))
        .await?;
    Ok(Json(rows))
}

/// GET /api/notifications/{user_id} -- super_admin view of any feed.
pub async fn list_for_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<Uuid>,
    Query(q): Query<NotificationListQuery>,
) -> Result<Json<Vec<NotificationRow>>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    if actor.user_id != user_id {
        actor.require_super_admin()?;
    }

    let rows = NotificationRepo::new(state.db.clone())
        .list_for_user(user_id, Some(LimitOffset::clamped(q.limit, q.offset)))
        .await?;
    Ok(Json(rows))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationRow>, AppError> {
    let actor = Actor::from_claims(&claims)?;

    let row = NotificationRepo::new(state.db.clone())
        .mark_read(id, actor.user_id)
        .await?
        .ok_or(AppError::NotFound("notification"))?;
    Ok(Json(row))
}
