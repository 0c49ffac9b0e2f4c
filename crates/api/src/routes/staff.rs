use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use infra::models::StaffRow;
use infra::repos::{CreateStaff, GateOutcome, StaffRepo, UpdateStaff, UserRepo};

use crate::auth::{Actor, Claims, PasswordService, Role};
use crate::error::AppError;
use crate::routes::{owns_or_admin, tenant_scope};
use crate::services::limits::limits_for_owner;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    /// super_admin only: provision for this owner.
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub job_title: String,
    #[serde(default)]
    pub salary_cents: i64,
    pub shift: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStaffRequest {
    pub job_title: Option<String>,
    pub salary_cents: Option<i64>,
    pub shift: Option<String>,
}

/// GET /api/staff
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<StaffRow>>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    actor.require_owner_or_admin()?;

    let repo = StaffRepo::new(state.db.clone());
    let rows = match tenant_scope(&state, &actor).await? {
        Some(owner_id) => repo.list_for_owner(owner_id).await?,
        None => repo.list_all().await?,
    };

    Ok(Json(rows))
}

/// POST /api/staff -- provisions the staff login account and the staff
/// record together, under the owner's plan cap.
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<StaffRow>), AppError> {
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

    if req.name.trim().is_empty() || req.job_title.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and job_title must not be empty".to_string(),
        ));
    }
    PasswordService::validate_password_strength(&req.password)?;

    let shift = req.shift.unwrap_or_else(|| "full_day".to_string());
    if !matches!(
        shift.as_str(),
        "morning" | "evening" | "night" | "full_day"
    ) {
        return Err(AppError::BadRequest(format!("unknown shift '{shift}'")));
    }

    if UserRepo::new(state.db.clone())
        .get_by_email(&req.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("email already registered".to_string()));
    }

    let limits = limits_for_owner(&state, owner_id).await?;

    let outcome = StaffRepo::new(state.db.clone())
        .create_gated(
            CreateStaff {
                owner_id,
                email: req.email.trim().to_lowercase(),
                password_hash: PasswordService::hash_password(&req.password)?,
                name: req.name.trim().to_string(),
                phone: req.phone,
                job_title: req.job_title.trim().to_string(),
                salary_cents: req.salary_cents,
                shift,
            },
            limits.max_staff,
        )
        .await?;

    match outcome {
        GateOutcome::Created(row) => Ok((StatusCode::CREATED, Json(row))),
        GateOutcome::OwnerNotFound => Err(AppError::NotFound("owner")),
        GateOutcome::LimitReached { current, max } => Err(AppError::LimitReached {
            resource: "staff",
            current,
            max,
        }),
    }
}

/// GET /api/staff/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<StaffRow>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    actor.require_owner_or_admin()?;
    let scope = tenant_scope(&state, &actor).await?;

    let row = StaffRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or(AppError::NotFound("staff member"))?;
    if !owns_or_admin(&actor, scope, row.owner_id) {
        return Err(AppError::Forbidden("not your staff member".to_string()));
    }

    Ok(Json(row))
}

/// PUT /api/staff/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStaffRequest>,
) -> Result<Json<StaffRow>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    actor.require_owner_or_admin()?;
    let scope = tenant_scope(&state, &actor).await?;

    let repo = StaffRepo::new(state.db.clone());
    let row = repo.get(id).await?.ok_or(AppError::NotFound("staff member"))?;
    if !owns_or_admin(&actor, scope, row.owner_id) {
        return Err(AppError::Forbidden("not your staff member".to_string()));
    }

    if let Some(shift) = &req.shift {
        if !matches!(
            shift.as_str(),
            "morning" | "evening" | "night" | "full_day"
        ) {
            return Err(AppError::BadRequest(format!("unknown shift '{shift}'")));
        }
    }

    let row = repo
        .update(
            id,
            UpdateStaff {
                job_title: req.job_title,
                salary_cents: req.salary_cents,
                shift: req.shift,
            },
        )
        .await?
        .ok_or(AppError::NotFound("staff member"))?;

    Ok(Json(row))
}

/// DELETE /api/staff/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let actor = Actor::from_claims(&claims)?;
    actor.require_owner_or_admin()?;
    let scope = tenant_scope(&state, &actor).await?;

    let repo = StaffRepo::new(state.db.clone());
    let row = repo.get(id).await?.ok_or(AppError::NotFound("staff member"))?;
    if !owns_or_admin(&actor, scope, row.owner_id) {
        return Err(AppError::Forbidden("not your staff member".to_string()));
    }

    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
