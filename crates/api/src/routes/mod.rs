pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod notifications;
pub mod owners;
pub mod players;
pub mod revenue_models;
pub mod staff;
pub mod subscriptions;
pub mod turfs;
pub mod types;

use infra::repos::UserRepo;
use uuid::Uuid;

use crate::auth::{Actor, Role};
use crate::error::AppError;
use crate::state::AppState;

/// Tenant scope for list/aggregate queries: `None` widens to the whole
/// platform (super_admin); owners are scoped to themselves and staff to
/// the owner they work for.
pub async fn tenant_scope(state: &AppState, actor: &Actor) -> Result<Option<Uuid>, AppError> {
    match actor.role {
        Role::SuperAdmin => Ok(None),
        Role::TurfOwner => Ok(Some(actor.user_id)),
        Role::Staff => {
            let user = UserRepo::new(state.db.clone())
                .get_by_id(actor.user_id)
                .await?
                .ok_or(AppError::NotFound("user"))?;
            user.owner_id
                .map(Some)
                .ok_or_else(|| AppError::Forbidden("staff account has no owner".to_string()))
        }
    }
}

/// True when the actor may touch rows belonging to `owner_id`.
pub fn owns_or_admin(actor: &Actor, scope: Option<Uuid>, owner_id: Uuid) -> bool {
    actor.is_super_admin() || scope == Some(owner_id)
}
