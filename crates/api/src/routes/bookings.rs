use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use infra::models::BookingRow;
use infra::pagination::LimitOffset;
use infra::repos::{
    BookingAttempt, BookingFilter, BookingRepo, CreateBooking, StatusChange, TurfRepo,
};

use crate::auth::{Actor, Claims};
use crate::error::AppError;
use crate::routes::types::hhmm_to_minutes;
use crate::routes::{owns_or_admin, tenant_scope};
use crate::services::limits::limits_for_owner;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub turf_id: Option<Uuid>,
    pub player_id: Option<Uuid>,
    pub status: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub turf_id: Uuid,
    pub player_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub kind: Option<String>,
    pub plan: Option<String>,
    pub amount_cents: i64,
    #[serde(default)]
    pub advance_cents: i64,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub status: Option<String>,
    pub amount_cents: Option<i64>,
    pub advance_cents: Option<i64>,
    pub notes: Option<String>,
}

/// GET /api/bookings
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingRow>>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    let scope = tenant_scope(&state, &actor).await?;

    let rows = BookingRepo::new(state.db.clone())
        .list(
            BookingFilter {
                turf_id: q.turf_id,
                owner_id: scope,
                player_id: q.player_id,
                status: q.status,
                from: q.from,
                to: q.to,
            },
            Some(LimitOffset::clamped(q.limit, q.offset)),
        )
        .await?;

    Ok(Json(rows))
}

/// POST /api/bookings -- the slot claim. Overlap check, monthly plan cap,
/// insert, counters and the owner notification all commit atomically.
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingRow>), AppError> {
    let actor = Actor::from_claims(&claims)?;
    let scope = tenant_scope(&state, &actor).await?;

    let turf = TurfRepo::new(state.db.clone())
        .get(req.turf_id)
        .await?
        .ok_or(AppError::NotFound("turf"))?;
    if !owns_or_admin(&actor, scope, turf.owner_id) {
        return Err(AppError::Forbidden("not your turf".to_string()));
    }
    if !turf.is_active {
        return Err(AppError::BadRequest("turf is not active".to_string()));
    }

    let start_minute = hhmm_to_minutes(&req.start_time)?;
    let end_minute = hhmm_to_minutes(&req.end_time)?;
    if start_minute >= end_minute {
        return Err(AppError::BadRequest(
            "start_time must be before end_time".to_string(),
        ));
    }

    let kind = req.kind.unwrap_or_else(|| "online".to_string());
    if !matches!(kind.as_str(), "online" | "offline") {
        return Err(AppError::BadRequest(format!("unknown kind '{kind}'")));
    }
    let plan = req.plan.unwrap_or_else(|| "single".to_string());
    if !matches!(plan.as_str(), "single" | "daily" | "weekly" | "monthly") {
        return Err(AppError::BadRequest(format!("unknown plan '{plan}'")));
    }
    let status = req.status.unwrap_or_else(|| "pending".to_string());
    if !matches!(status.as_str(), "pending" | "confirmed") {
        return Err(AppError::BadRequest(
            "bookings are created pending or confirmed".to_string(),
        ));
    }
    if req.amount_cents < 0 || req.advance_cents < 0 || req.advance_cents > req.amount_cents {
        return Err(AppError::BadRequest("invalid amounts".to_string()));
    }

    let limits = limits_for_owner(&state, turf.owner_id).await?;

    let attempt = BookingRepo::new(state.db.clone())
        .create_gated(
            CreateBooking {
                turf_id: req.turf_id,
                player_id: req.player_id,
                created_by: Some(actor.user_id),
                booked_on: req.date,
                start_minute,
                end_minute,
                kind,
                plan,
                amount_cents: req.amount_cents,
                advance_cents: req.advance_cents,
                status,
                notes: req.notes,
            },
            limits.max_bookings_per_month,
        )
        .await?;

    match attempt {
        BookingAttempt::Created(row) => Ok((StatusCode::CREATED, Json(row))),
        BookingAttempt::TurfNotFound => Err(AppError::NotFound("turf")),
        BookingAttempt::SlotTaken => Err(AppError::SlotTaken),
        BookingAttempt::OutsideOpenHours {
            open_hour,
            close_hour,
        } => Err(AppError::BadRequest(format!(
            "booking must fall within opening hours {open_hour:02}:00-{close_hour:02}:00"
        ))),
        BookingAttempt::MonthlyLimitReached { current, max } => Err(AppError::LimitReached {
            resource: "bookings",
            current,
            max,
        }),
    }
}

/// GET /api/bookings/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingRow>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    let scope = tenant_scope(&state, &actor).await?;

    let booking = fetch_scoped(&state, &actor, scope, id).await?;
    Ok(Json(booking))
}

/// PUT /api/bookings/{id} -- payment/notes edits plus status transitions.
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<BookingRow>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    let scope = tenant_scope(&state, &actor).await?;

    let mut booking = fetch_scoped(&state, &actor, scope, id).await?;
    let repo = BookingRepo::new(state.db.clone());

    if req.amount_cents.is_some() || req.advance_cents.is_some() || req.notes.is_some() {
        booking = repo
            .update_payment(id, req.amount_cents, req.advance_cents, req.notes.clone())
            .await?
            .ok_or(AppError::NotFound("booking"))?;
    }

    if let Some(new_status) = req.status {
        if !matches!(new_status.as_str(), "pending" | "confirmed" | "cancelled") {
            return Err(AppError::BadRequest(format!(
                "unknown status '{new_status}'"
            )));
        }
        booking = match repo.set_status(id, &new_status).await? {
            StatusChange::Updated(row) => row,
            StatusChange::NotFound => return Err(AppError::NotFound("booking")),
            StatusChange::Illegal { from } => {
                return Err(AppError::BadRequest(format!(
                    "cannot move a {from} booking to {new_status}"
                )))
            }
        };
    }

    Ok(Json(booking))
}

/// DELETE /api/bookings/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let actor = Actor::from_claims(&claims)?;
    actor.require_owner_or_admin()?;
    let scope = tenant_scope(&state, &actor).await?;

    fetch_scoped(&state, &actor, scope, id).await?;
    BookingRepo::new(state.db.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_scoped(
    state: &AppState,
    actor: &Actor,
    scope: Option<Uuid>,
    id: Uuid,
) -> Result<BookingRow, AppError> {
    let booking = BookingRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or(AppError::NotFound("booking"))?;

    let turf = TurfRepo::new(state.db.clone())
        .get(booking.turf_id)
        .await?
        .ok_or(AppError::NotFound("turf"))?;

    if !owns_or_admin(actor, scope, turf.owner_id) {
        return Err(AppError::Forbidden("not your booking".to_string()));
    }

    Ok(booking)
}
