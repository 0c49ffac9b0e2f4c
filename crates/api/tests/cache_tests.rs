mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use api::auth::AuthMiddleware;
use api::middleware::response_cache;
use axum::middleware::from_fn_with_state;
use axum::{Json, Router};
use common::*;
use serde_json::json;
use uuid::Uuid;

/// A counting handler behind the real JWT + cache middleware stack; the
/// counter tells us whether the cache or the handler answered.
fn counting_app(state: api::AppState, hits: Arc<AtomicUsize>) -> Router {
    let post_hits = hits.clone();

    Router::new()
        .route(
            "/counted",
            axum::routing::get(move || {
                let hits = hits.clone();
                async move {
                    let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
                    Json(json!({ "handler_runs": n }))
                }
            }),
        )
        .route(
            "/counted",
            axum::routing::post(move || {
                let post_hits = post_hits.clone();
                async move {
                    let n = post_hits.fetch_add(1, Ordering::SeqCst) + 1;
                    Json(json!({ "handler_runs": n }))
                }
            }),
        )
        .layer(from_fn_with_state(state.clone(), response_cache))
        .layer(from_fn_with_state(state.clone(), AuthMiddleware::jwt_auth))
        .with_state(state)
}

fn x_cache(response: &axum::http::Response<axum::body::Body>) -> String {
    response
        .headers()
        .get("x-cache")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

#[tokio::test]
async fn second_identical_get_within_ttl_is_a_hit() {
    let state = lazy_state();
    let token = token_for(&state, Uuid::new_v4(), "owner@example.com", "turf_owner");
    let app = counting_app(state, Arc::new(AtomicUsize::new(0)));

    let (status, body, response) = send(&app, get("/counted", Some(&token))).await;
    assert_eq!(status, 200);
    assert_eq!(x_cache(&response), "MISS");
    assert_eq!(body["handler_runs"], 1);

    let (status, body, response) = send(&app, get("/counted", Some(&token))).await;
    assert_eq!(status, 200);
    assert_eq!(x_cache(&response), "HIT");
    // The handler never ran again; the cached body is replayed verbatim.
    assert_eq!(body["handler_runs"], 1);
}

#[tokio::test]
async fn cache_keys_are_scoped_per_subject() {
    let state = lazy_state();
    let token_a = token_for(&state, Uuid::new_v4(), "a@example.com", "turf_owner");
    let token_b = token_for(&state, Uuid::new_v4(), "b@example.com", "turf_owner");
    let app = counting_app(state, Arc::new(AtomicUsize::new(0)));

    let (_, body, response) = send(&app, get("/counted", Some(&token_a))).await;
    assert_eq!(x_cache(&response), "MISS");
    assert_eq!(body["handler_runs"], 1);

    // Same URI, different subject: must not see the other tenant's entry.
    let (_, body, response) = send(&app, get("/counted", Some(&token_b))).await;
    assert_eq!(x_cache(&response), "MISS");
    assert_eq!(body["handler_runs"], 2);
}

#[tokio::test]
async fn posts_bypass_the_cache() {
    let state = lazy_state();
    let token = token_for(&state, Uuid::new_v4(), "owner@example.com", "turf_owner");
    let app = counting_app(state, Arc::new(AtomicUsize::new(0)));

    let (_, body, response) = send(&app, post("/counted", Some(&token), json!({}))).await;
    assert_eq!(x_cache(&response), "");
    assert_eq!(body["handler_runs"], 1);

    let (_, body, _) = send(&app, post("/counted", Some(&token), json!({}))).await;
    assert_eq!(body["handler_runs"], 2);
}
