use std::time::Duration;

use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use crate::middleware::response_cache;
use crate::routes::{
    auth, bookings, dashboard, notifications, owners, players, revenue_models, staff,
    subscriptions, turfs,
};
use crate::state::AppState;

/// Build the Axum router: public auth endpoints, the JWT-protected REST
/// surface under /api, and the TTL cache wrapped around the aggregate
/// dashboards.
pub fn build_router(state: AppState) -> Router {
    let cached = Router::new()
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/analytics/advanced", get(dashboard::advanced))
        .layer(from_fn_with_state(state.clone(), response_cache));

    let protected = Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/turfs", get(turfs::list).post(turfs::create))
        .route(
            "/turfs/{id}",
            get(turfs::get).put(turfs::update).delete(turfs::delete),
        )
        .route("/turfs/{id}/available-slots", get(turfs::slots))
        .route("/turf-stats", get(dashboard::turf_stats))
        .route("/bookings", get(bookings::list).post(bookings::create))
        .route(
            "/bookings/{id}",
            get(bookings::get)
                .put(bookings::update)
                .delete(bookings::delete),
        )
        .route("/bookings-stats", get(dashboard::booking_stats))
        .route("/players", get(players::list).post(players::create))
        .route(
            "/players/{id}",
            get(players::get).put(players::update).delete(players::delete),
        )
        .route("/staff", get(staff::list).post(staff::create))
        .route(
            "/staff/{id}",
            get(staff::get).put(staff::update).delete(staff::delete),
        )
        .route(
            "/revenue-models",
            get(revenue_models::list).post(revenue_models::create),
        )
        .route(
            "/revenue-models/{id}",
            get(revenue_models::get)
                .put(revenue_models::update)
                .delete(revenue_models::delete),
        )
        .route(
            "/subscriptions",
            get(subscriptions::list).post(subscriptions::create),
        )
        .route(
            "/subscriptions/{id}",
            get(subscriptions::get)
                .put(subscriptions::update)
                .delete(subscriptions::delete),
        )
        .route("/turf-owners", get(owners::list).post(owners::create))
        .route(
            "/turf-owners/{id}",
            get(owners::get).put(owners::update).delete(owners::delete),
        )
        .route("/notifications", get(notifications::list_own))
        .route("/notifications/{user_id}", get(notifications::list_for_user))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route("/my-subscription", get(subscriptions::my_subscription))
        .route("/my-subscriptions", get(subscriptions::my_subscriptions))
        .route(
            "/subscribe-revenue-model",
            post(subscriptions::subscribe),
        )
        .merge(cached)
        // JWT is added last so it runs outermost: the cache middleware
        // keys on the claims it leaves in the extensions.
        .layer(from_fn_with_state(state.clone(), AuthMiddleware::jwt_auth));

    let api = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
}

/// Liveness + quick DB probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    infra::db::ping(&state.db).await?;
    Ok("ok")
}
