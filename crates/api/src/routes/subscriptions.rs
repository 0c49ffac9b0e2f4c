use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::models::{RevenueModelRow, SubscriptionRow};
use infra::repos::{
    BookingRepo, CreateSubscription, RevenueModelRepo, StaffRepo, SubscriptionRepo, TurfRepo,
    UserRepo,
};

use crate::auth::{Actor, Claims};
use crate::error::AppError;
use crate::services::limits::limits_for_owner;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub owner_id: Uuid,
    pub revenue_model_id: Uuid,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub payment_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub revenue_model_id: Uuid,
    /// "monthly" (default) or "yearly".
    pub billing: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub payment_status: String,
}

#[derive(Debug, Serialize)]
pub struct UsageEntry {
    pub current: i64,
    pub max: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MySubscription {
    pub subscription: SubscriptionRow,
    pub plan: RevenueModelRow,
    pub turfs: UsageEntry,
    pub staff: UsageEntry,
    pub bookings_this_month: UsageEntry,
}

/// GET /api/subscriptions (super_admin)
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<SubscriptionRow>>, AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;
    let rows = SubscriptionRepo::new(state.db.clone()).list_all().await?;
    Ok(Json(rows))
}

/// POST /api/subscriptions (super_admin) -- bind any owner to a plan for
/// an explicit period.
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<SubscriptionRow>), AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;

    if req.starts_on >= req.ends_on {
        return Err(AppError::BadRequest(
            "starts_on must be before ends_on".to_string(),
        ));
    }
    let payment_status = req.payment_status.unwrap_or_else(|| "due".to_string());
    validate_payment_status(&payment_status)?;

    let owner = UserRepo::new(state.db.clone())
        .get_by_id(req.owner_id)
        .await?
        .ok_or(AppError::NotFound("owner"))?;
    if owner.role != "turf_owner" {
        return Err(AppError::BadRequest(
            "subscriptions only attach to turf owners".to_string(),
        ));
    }

    RevenueModelRepo::new(state.db.clone())
        .get(req.revenue_model_id)
        .await?
        .ok_or(AppError::NotFound("revenue model"))?;

    let row = SubscriptionRepo::new(state.db.clone())
        .subscribe(CreateSubscription {
            owner_id: req.owner_id,
            revenue_model_id: req.revenue_model_id,
            starts_on: req.starts_on,
            ends_on: req.ends_on,
            payment_status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/subscriptions/{id} (super_admin)
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubscriptionRow>, AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;
    let row = SubscriptionRepo::new(state.db.clone())
        .get(id)
        .await?
        .ok_or(AppError::NotFound("subscription"))?;
    Ok(Json(row))
}

/// PUT /api/subscriptions/{id} (super_admin) -- payment status only.
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSubscriptionRequest>,
) -> Result<Json<SubscriptionRow>, AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;
    validate_payment_status(&req.payment_status)?;

    let row = SubscriptionRepo::new(state.db.clone())
        .set_payment_status(id, &req.payment_status)
        .await?
        .ok_or(AppError::NotFound("subscription"))?;
    Ok(Json(row))
}

/// DELETE /api/subscriptions/{id} (super_admin)
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    Actor::from_claims(&claims)?.require_super_admin()?;
    let deleted = SubscriptionRepo::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("subscription"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/my-subscription -- active subscription plus usage vs caps.
pub async fn my_subscription(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MySubscription>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    actor.require_owner_or_admin()?;
    let owner_id = actor.user_id;

    let subscription = SubscriptionRepo::new(state.db.clone())
        .active_for_owner(owner_id)
        .await?
        .ok_or(AppError::NotFound("active subscription"))?;

    let limits = limits_for_owner(&state, owner_id).await?;
    let plan = limits
        .plan
        .clone()
        .ok_or(AppError::NotFound("revenue model"))?;

    let turfs = TurfRepo::new(state.db.clone())
        .count_for_owner(owner_id)
        .await?;
    let staff = StaffRepo::new(state.db.clone())
        .count_for_owner(owner_id)
        .await?;
    let bookings = BookingRepo::new(state.db.clone())
        .count_month_for_owner(owner_id, Utc::now().date_naive())
        .await?;

    Ok(Json(MySubscription {
        subscription,
        plan,
        turfs: UsageEntry {
            current: turfs,
            max: limits.max_turfs,
        },
        staff: UsageEntry {
            current: staff,
            max: limits.max_staff,
        },
        bookings_this_month: UsageEntry {
            current: bookings,
            max: limits.max_bookings_per_month,
        },
    }))
}

/// GET /api/my-subscriptions -- full history, newest first.
pub async fn my_subscriptions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<SubscriptionRow>>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    actor.require_owner_or_admin()?;

    let rows = SubscriptionRepo::new(state.db.clone())
        .list_for_owner(actor.user_id)
        .await?;
    Ok(Json(rows))
}

/// POST /api/subscribe-revenue-model -- owner self-subscribe; any active
/// subscription is retired in the same transaction.
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscriptionRow>), AppError> {
    let actor = Actor::from_claims(&claims)?;
    actor.require_owner_or_admin()?;

    let plan = RevenueModelRepo::new(state.db.clone())
        .get(req.revenue_model_id)
        .await?
        .ok_or(AppError::NotFound("revenue model"))?;
    if !plan.is_active {
        return Err(AppError::BadRequest("plan is retired".to_string()));
    }

    let months = match req.billing.as_deref() {
        None | Some("monthly") => 1,
        Some("yearly") => 12,
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "unknown billing period '{other}'"
            )))
        }
    };

    let starts_on = Utc::now().date_naive();
    let ends_on = starts_on
        .checked_add_months(Months::new(months))
        .ok_or_else(|| AppError::Internal("date overflow".to_string()))?;

    let row = SubscriptionRepo::new(state.db.clone())
        .subscribe(CreateSubscription {
            owner_id: actor.user_id,
            revenue_model_id: plan.id,
            starts_on,
            ends_on,
            payment_status: "paid".to_string(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

fn validate_payment_status(status: &str) -> Result<(), AppError> {
    if !matches!(status, "paid" | "due" | "failed") {
        return Err(AppError::BadRequest(format!(
            "unknown payment status '{status}'"
        )));
    }
    Ok(())
}
