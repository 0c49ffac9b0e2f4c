mod common;

use api::app::build_router;
use common::*;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn staff_cannot_create_turfs() {
    let state = lazy_state();
    let token = token_for(&state, Uuid::new_v4(), "staff@example.com", "staff");
    let app = build_router(state);

    let (status, _, _) = send(
        &app,
        post(
            "/api/turfs",
            Some(&token),
            json!({ "name": "Arena", "price_per_hour_cents": 150000 }),
        ),
    )
    .await;

    assert_eq!(status, 403);
}

#[tokio::test]
async fn owner_cannot_create_revenue_models() {
    let state = lazy_state();
    let token = token_for(&state, Uuid::new_v4(), "owner@example.com", "turf_owner");
    let app = build_router(state);

    let (status, body, _) = send(
        &app,
        post(
            "/api/revenue-models",
            Some(&token),
            json!({
                "name": "Gold",
                "monthly_price_cents": 99900,
                "yearly_price_cents": 999900
            }),
        ),
    )
    .await;

    assert_eq!(status, 403);
    assert!(body["error"].as_str().unwrap().contains("super_admin"));
}

#[tokio::test]
async fn owner_cannot_list_all_subscriptions() {
    let state = lazy_state();
    let token = token_for(&state, Uuid::new_v4(), "owner@example.com", "turf_owner");
    let app = build_router(state);

    let (status, _, _) = send(&app, get("/api/subscriptions", Some(&token))).await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn unknown_role_in_token_is_rejected() {
    let state = lazy_state();
    let token = token_for(&state, Uuid::new_v4(), "who@example.com", "manager");
    let app = build_router(state);

    let (status, _, _) = send(&app, get("/api/subscriptions", Some(&token))).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn super_admin_turf_create_requires_target_owner() {
    let state = lazy_state();
    let token = token_for(&state, Uuid::new_v4(), "admin@example.com", "super_admin");
    let app = build_router(state);

    let (status, body, _) = send(
        &app,
        post(
            "/api/turfs",
            Some(&token),
            json!({ "name": "Arena", "price_per_hour_cents": 150000 }),
        ),
    )
    .await;

    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("owner_id"));
}

#[tokio::test]
async fn turf_create_validates_open_window() {
    let state = lazy_state();
    let token = token_for(&state, Uuid::new_v4(), "owner@example.com", "turf_owner");
    let app = build_router(state);

    let (status, _, _) = send(
        &app,
        post(
            "/api/turfs",
            Some(&token),
            json!({
                "name": "Arena",
                "price_per_hour_cents": 150000,
                "open_hour": 22,
                "close_hour": 6
            }),
        ),
    )
    .await;

    assert_eq!(status, 400);
}
