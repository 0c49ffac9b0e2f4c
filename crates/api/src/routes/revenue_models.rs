use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use infra::models::RevenueModelRow;
use infra::repos::{CreateRevenueModel, RevenueModelRepo, UpdateRevenueModel};

use crate::auth::{Actor, Claims};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRevenueModelRequest {
    pub name: String,
    pub description: Option<String>,
    pub monthly_price_cents: i64,
    pub yearly_price_cents: i64,
    pub max_turfs: Option<i32>,
    pub max_staff: Option<i32>,
    pub max_bookings_per_month: Option<i32>,
    #[serde(default)]
    pub commission_bps: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRevenueModelRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub monthly_price_cents: Option<i64>,
    pub yearly_price_cents: Option<i64>,
    pub commission_bps: Option<i32>,
    pub is_active: Option<bool>,
}

/// GET /api/revenue-models -- owners see the active catalogue;
/// super_admin sees everything including retired plans.
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<RevenueModelRow>>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    let rows = RevenueModelRepo::new(state.db.clone())
        .list(!actor.is_super_admin())
        .await?;
    Ok(Json(rows))
}

/// POST /api/revenue-models
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateRevenueModelRequest>,
) -> Result<(StatusCode, Json<RevenueModelRow>), AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if req.monthly_price_cents < 0 || req.yearly_price_cents < 0 {
        return Err(AppError::BadRequest("prices must not be negative".to_string()));
    }
    if req.commission_bps < 0 || req.commission_bps > 10_000 {
        return Err(AppError::BadRequest(
            "commission must be between 0 and 10000 basis points".to_string(),
        ));
    }

    let row = RevenueModelRepo::new(state.db.clone())
        .create(CreateRevenueModel {
            name: req.name.trim().to_string(),
            description: req.description,
            monthly_price_cents: req.monthly_price_cents,
            yearly_price_cents: req.yearly_price_cents,
            max_turfs: req.max_turfs,
            max_staff: req.max_staff,
            max_bookings_per_month: req.max_bookings_per_month,
            commission_bps: req.commission_bps,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/revenue-models/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RevenueModelRow>, AppError> {
    let row = RevenueModelRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or(AppError::NotFound("revenue model"))?;
    Ok(Json(row))
}

/// PUT /api/revenue-models/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRevenueModelRequest>,
) -> Result<Json<RevenueModelRow>, AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;

    let row = RevenueModelRepo::new(state.db.clone())
        .update(
            id,
            UpdateRevenueModel {
                name: req.name,
                description: req.description,
                monthly_price_cents: req.monthly_price_cents,
                yearly_price_cents: req.yearly_price_cents,
                commission_bps: req.commission_bps,
                is_active: req.is_active,
            },
        )
        .await?
        .ok_or(AppError::NotFound("revenue model"))?;

    Ok(Json(row))
}

/// DELETE /api/revenue-models/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;

    let deleted = RevenueModelRepo::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("revenue model"));
    }
    Ok(StatusCode::NO_CONTENT)
}
