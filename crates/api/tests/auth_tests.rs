mod common;

use api::app::build_router;
use common::*;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let state = lazy_state();
    let app = build_router(state);

    let (status, body, _) = send(&app, post("/api/logout", None, json!({}))).await;
    assert_eq!(status, 401);
    assert!(body["error"].as_str().unwrap().contains("authorization"));
}

#[tokio::test]
async fn protected_route_with_garbage_token_is_401() {
    let state = lazy_state();
    let app = build_router(state);

    let (status, _, _) = send(&app, post("/api/logout", Some("not.a.jwt"), json!({}))).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn valid_token_passes_the_middleware() {
    let state = lazy_state();
    let token = token_for(&state, Uuid::new_v4(), "owner@example.com", "turf_owner");
    let app = build_router(state);

    let (status, body, _) = send(&app, post("/api/logout", Some(&token), json!({}))).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "logged out");
}

#[tokio::test]
async fn register_rejects_weak_passwords_before_touching_the_db() {
    let state = lazy_state();
    let app = build_router(state);

    let (status, body, _) = send(
        &app,
        post(
            "/api/register",
            None,
            json!({
                "name": "New Owner",
                "email": "new@example.com",
                "password": "short1"
            }),
        ),
    )
    .await;

    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("8 characters"));
}

#[tokio::test]
async fn register_rejects_bad_email() {
    let state = lazy_state();
    let app = build_router(state);

    let (status, _, _) = send(
        &app,
        post(
            "/api/register",
            None,
            json!({
                "name": "New Owner",
                "email": "not-an-email",
                "password": "goalpost9"
            }),
        ),
    )
    .await;

    assert_eq!(status, 400);
}
