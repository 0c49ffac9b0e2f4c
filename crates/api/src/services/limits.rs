use infra::models::RevenueModelRow;
use infra::repos::SubscriptionRepo;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Effective resource caps for one owner, derived from their active
/// subscription's revenue model. `None` means uncapped. An owner with no
/// active subscription gets the strictest reading: zero of everything.
#[derive(Debug, Clone)]
pub struct PlanLimits {
    pub plan: Option<RevenueModelRow>,
    pub max_turfs: Option<i64>,
    pub max_staff: Option<i64>,
    pub max_bookings_per_month: Option<i64>,
}

impl PlanLimits {
    fn unsubscribed() -> Self {
        Self {
            plan: None,
            max_turfs: Some(0),
            max_staff: Some(0),
            max_bookings_per_month: Some(0),
        }
    }

    fn from_plan(plan: RevenueModelRow) -> Self {
        Self {
            max_turfs: plan.max_turfs.map(i64::from),
            max_staff: plan.max_staff.map(i64::from),
            max_bookings_per_month: plan.max_bookings_per_month.map(i64::from),
            plan: Some(plan),
        }
    }
}

pub async fn limits_for_owner(state: &AppState, owner_id: Uuid) -> Result<PlanLimits, AppError> {
    let repo = SubscriptionRepo::new(state.db.clone());
    let plan = repo.active_plan_for_owner(owner_id).await?;

    Ok(match plan {
        Some(plan) => PlanLimits::from_plan(plan),
        None => PlanLimits::unsubscribed(),
    })
}
