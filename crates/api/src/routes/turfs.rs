use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use infra::models::TurfRow;
use infra::pagination::LimitOffset;
use infra::repos::{BookingRepo, CreateTurf, GateOutcome, TurfFilter, TurfRepo, UpdateTurf};
use infra::slots::available_slots;

use crate::auth::{Actor, Claims, Role};
use crate::error::AppError;
use crate::routes::types::ApiSlot;
use crate::routes::{owns_or_admin, tenant_scope};
use crate::services::limits::limits_for_owner;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TurfListQuery {
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTurfRequest {
    /// super_admin only: create on behalf of this owner.
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_hour_cents: i64,
    pub capacity: Option<i32>,
    #[serde(default)]
    pub has_floodlights: bool,
    #[serde(default)]
    pub has_parking: bool,
    #[serde(default)]
    pub has_changing_rooms: bool,
    pub open_hour: Option<i32>,
    pub close_hour: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTurfRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_hour_cents: Option<i64>,
    pub capacity: Option<i32>,
    pub has_floodlights: Option<bool>,
    pub has_parking: Option<bool>,
    pub has_changing_rooms: Option<bool>,
    pub open_hour: Option<i32>,
    pub close_hour: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

/// GET /api/turfs
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<TurfListQuery>,
) -> Result<Json<Vec<TurfRow>>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    let scope = tenant_scope(&state, &actor).await?;

    let rows = TurfRepo::new(state.db.clone())
        .list(
            TurfFilter {
                owner_id: scope,
                is_active: q.is_active,
            },
            Some(LimitOffset::clamped(q.limit, q.offset)),
        )
        .await?;

    Ok(Json(rows))
}

/// POST /api/turfs -- runs the subscription limit gate for the target
/// owner inside the insert transaction.
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateTurfRequest>,
) -> Result<(StatusCode, Json<TurfRow>), AppError> {
    let actor = Actor::from_claims(&claims)?;
    actor.require_owner_or_admin()?;

    let owner_id = match (actor.role, req.owner_id) {
        (Role::SuperAdmin, Some(owner)) => owner,
        (Role::SuperAdmin, None) => {
            return Err(AppError::BadRequest(
                "owner_id is required for super_admin".to_string(),
            ))
        }
        _ => actor.user_id,
    };

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if req.price_per_hour_cents < 0 {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }
    let open_hour = req.open_hour.unwrap_or(6);
    let close_hour = req.close_hour.unwrap_or(23);
    validate_hours(open_hour, close_hour)?;

    let limits = limits_for_owner(&state, owner_id).await?;

    let outcome = TurfRepo::new(state.db.clone())
        .create_gated(
            CreateTurf {
                owner_id,
                name: req.name.trim().to_string(),
                description: req.description,
                location: req.location,
                price_per_hour_cents: req.price_per_hour_cents,
                capacity: req.capacity.unwrap_or(10),
                has_floodlights: req.has_floodlights,
                has_parking: req.has_parking,
                has_changing_rooms: req.has_changing_rooms,
                open_hour,
                close_hour,
            },
            limits.max_turfs,
        )
        .await?;

    match outcome {
        GateOutcome::Created(row) => Ok((StatusCode::CREATED, Json(row))),
        GateOutcome::OwnerNotFound => Err(AppError::NotFound("owner")),
        GateOutcome::LimitReached { current, max } => Err(AppError::LimitReached {
            resource: "turfs",
            current,
            max,
        }),
    }
}

/// GET /api/turfs/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<TurfRow>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    let scope = tenant_scope(&state, &actor).await?;

    let turf = TurfRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or(AppError::NotFound("turf"))?;

    if !owns_or_admin(&actor, scope, turf.owner_id) {
        return Err(AppError::Forbidden("not your turf".to_string()));
    }

    Ok(Json(turf))
}

/// PUT /api/turfs/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTurfRequest>,
) -> Result<Json<TurfRow>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    actor.require_owner_or_admin()?;
    let scope = tenant_scope(&state, &actor).await?;

    let repo = TurfRepo::new(state.db.clone());
    let turf = repo.get(id).await?.ok_or(AppError::NotFound("turf"))?;
    if !owns_or_admin(&actor, scope, turf.owner_id) {
        return Err(AppError::Forbidden("not your turf".to_string()));
    }

    let open = req.open_hour.unwrap_or(turf.open_hour);
    let close = req.close_hour.unwrap_or(turf.close_hour);
    validate_hours(open, close)?;

    let row = repo
        .update(
            id,
            UpdateTurf {
                name: req.name,
                description: req.description,
                location: req.location,
                price_per_hour_cents: req.price_per_hour_cents,
                capacity: req.capacity,
                has_floodlights: req.has_floodlights,
                has_parking: req.has_parking,
                has_changing_rooms: req.has_changing_rooms,
                open_hour: req.open_hour,
                close_hour: req.close_hour,
                is_active: req.is_active,
            },
        )
        .await?
        .ok_or(AppError::NotFound("turf"))?;

    Ok(Json(row))
}

/// DELETE /api/turfs/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let actor = Actor::from_claims(&claims)?;
    actor.require_owner_or_admin()?;
    let scope = tenant_scope(&state, &actor).await?;

    let repo = TurfRepo::new(state.db.clone());
    let turf = repo.get(id).await?.ok_or(AppError::NotFound("turf"))?;
    if !owns_or_admin(&actor, scope, turf.owner_id) {
        return Err(AppError::Forbidden("not your turf".to_string()));
    }

    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/turfs/{id}/available-slots?date=YYYY-MM-DD
pub async fn slots(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<SlotsQuery>,
) -> Result<Json<Vec<ApiSlot>>, AppError> {
    let turf = TurfRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or(AppError::NotFound("turf"))?;

    let taken = BookingRepo::new(state.db.clone())
        .taken_ranges(id, q.date)
        .await?;

    let slots = available_slots(turf.open_hour, turf.close_hour, &taken)
        .into_iter()
        .map(ApiSlot::from)
        .collect();

    Ok(Json(slots))
}

fn validate_hours(open_hour: i32, close_hour: i32) -> Result<(), AppError> {
    if !(0..=23).contains(&open_hour) || !(1..=24).contains(&close_hour) || open_hour >= close_hour
    {
        return Err(AppError::BadRequest(
            "open_hour/close_hour must form a valid window".to_string(),
        ));
    }
    Ok(())
}
