use axum::{extract::State, Extension, Json};
use serde::Serialize;

use infra::repos::dashboard::{BookingStats, DashboardStats, MonthlyRevenue, TopTurf, TurfStats};
use infra::repos::DashboardRepo;

use crate::auth::{Actor, Claims};
use crate::error::AppError;
use crate::routes::tenant_scope;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdvancedAnalytics {
    pub revenue_by_month: Vec<MonthlyRevenue>,
    pub top_turfs: Vec<TopTurf>,
}

/// GET /api/turf-stats
pub async fn turf_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<TurfStats>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    let scope = tenant_scope(&state, &actor).await?;

    let stats = DashboardRepo::new(state.db.clone()).turf_stats(scope).await?;
    Ok(Json(stats))
}

/// GET /api/bookings-stats
pub async fn booking_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<BookingStats>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    let scope = tenant_scope(&state, &actor).await?;

    let stats = DashboardRepo::new(state.db.clone())
        .booking_stats(scope)
        .await?;
    Ok(Json(stats))
}

/// GET /api/dashboard/stats -- the role branch collapses into the scope:
/// super_admin aggregates the whole platform, owners and staff their
/// tenant. Query failures propagate as 500s rather than zeroed blocks.
pub async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DashboardStats>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    let scope = tenant_scope(&state, &actor).await?;

    let stats = DashboardRepo::new(state.db.clone()).stats(scope).await?;
    Ok(Json(stats))
}

/// GET /api/analytics/advanced
pub async fn advanced(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AdvancedAnalytics>, AppError> {
    let actor = Actor::from_claims(&claims)?;
    let scope = tenant_scope(&state, &actor).await?;

    let repo = DashboardRepo::new(state.db.clone());
    let revenue_by_month = repo.revenue_by_month(scope, 6).await?;
    let top_turfs = repo.top_turfs(scope, 5).await?;

    Ok(Json(AdvancedAnalytics {
        revenue_by_month,
        top_turfs,
    }))
}
