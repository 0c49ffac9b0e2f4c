//! End-to-end flows against a real Postgres. These suites skip themselves
//! when TEST_DATABASE_URL is not set.

mod common;

use api::app::build_router;
use common::*;
use serde_json::json;
use uuid::Uuid;

fn unique_email(prefix: &str) -> String {
    format!("{prefix}+{}@example.com", Uuid::new_v4())
}

#[tokio::test]
async fn turf_create_over_plan_limit_returns_403_with_marker() {
    let Some(state) = db_state().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let owner_id = create_test_user(&state, &unique_email("owner"), "turf_owner", None).await;
    let plan_id = create_test_plan(&state, "One Turf Plan", Some(1)).await;
    subscribe_owner(&state, owner_id, plan_id).await;

    let token = token_for(&state, owner_id, "owner@example.com", "turf_owner");
    let app = build_router(state);

    let body = json!({ "name": "First Arena", "price_per_hour_cents": 150000 });
    let (status, _, _) = send(&app, post("/api/turfs", Some(&token), body)).await;
    assert_eq!(status, 201);

    let body = json!({ "name": "Second Arena", "price_per_hour_cents": 150000 });
    let (status, body, _) = send(&app, post("/api/turfs", Some(&token), body)).await;
    assert_eq!(status, 403);
    assert_eq!(body["limit_reached"], true);
}

#[tokio::test]
async fn unsubscribed_owner_cannot_create_turfs() {
    let Some(state) = db_state().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let owner_id = create_test_user(&state, &unique_email("owner"), "turf_owner", None).await;
    let token = token_for(&state, owner_id, "owner@example.com", "turf_owner");
    let app = build_router(state);

    let body = json!({ "name": "Arena", "price_per_hour_cents": 150000 });
    let (status, body, _) = send(&app, post("/api/turfs", Some(&token), body)).await;
    assert_eq!(status, 403);
    assert_eq!(body["limit_reached"], true);
}

#[tokio::test]
async fn overlapping_booking_is_rejected_with_409() {
    let Some(state) = db_state().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let owner_id = create_test_user(&state, &unique_email("owner"), "turf_owner", None).await;
    let plan_id = create_test_plan(&state, "Open Plan", None).await;
    subscribe_owner(&state, owner_id, plan_id).await;
    let turf_id = create_test_turf(&state, owner_id, "Clash Arena").await;

    let token = token_for(&state, owner_id, "owner@example.com", "turf_owner");
    let app = build_router(state);

    let booking = |start: &str, end: &str| {
        json!({
            "turf_id": turf_id,
            "date": "2026-09-05",
            "start_time": start,
            "end_time": end,
            "kind": "offline",
            "amount_cents": 150000,
            "status": "confirmed"
        })
    };

    let (status, _, _) = send(&app, post("/api/bookings", Some(&token), booking("10:00", "12:00"))).await;
    assert_eq!(status, 201);

    // Partial overlap.
    let (status, _, _) = send(&app, post("/api/bookings", Some(&token), booking("11:00", "13:00"))).await;
    assert_eq!(status, 409);

    // Back-to-back is fine.
    let (status, _, _) = send(&app, post("/api/bookings", Some(&token), booking("12:00", "13:00"))).await;
    assert_eq!(status, 201);
}

#[tokio::test]
async fn available_slots_exclude_confirmed_bookings() {
    let Some(state) = db_state().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let owner_id = create_test_user(&state, &unique_email("owner"), "turf_owner", None).await;
    let plan_id = create_test_plan(&state, "Open Plan", None).await;
    subscribe_owner(&state, owner_id, plan_id).await;
    let turf_id = create_test_turf(&state, owner_id, "Slot Arena").await;

    let token = token_for(&state, owner_id, "owner@example.com", "turf_owner");
    let app = build_router(state);

    let (status, _, _) = send(
        &app,
        post(
            "/api/bookings",
            Some(&token),
            json!({
                "turf_id": turf_id,
                "date": "2026-09-06",
                "start_time": "09:00",
                "end_time": "11:00",
                "kind": "offline",
                "amount_cents": 300000,
                "status": "confirmed"
            }),
        ),
    )
    .await;
    assert_eq!(status, 201);

    let (status, body, _) = send(
        &app,
        get(
            &format!("/api/turfs/{turf_id}/available-slots?date=2026-09-06"),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, 200);

    let slots: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["start"].as_str().unwrap().to_string())
        .collect();

    assert!(slots.contains(&"06:00".to_string()));
    assert!(!slots.contains(&"09:00".to_string()));
    assert!(!slots.contains(&"10:00".to_string()));
    assert!(slots.contains(&"11:00".to_string()));
}

#[tokio::test]
async fn monthly_booking_cap_counts_across_all_of_the_owners_turfs() {
    let Some(state) = db_state().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let owner_id = create_test_user(&state, &unique_email("owner"), "turf_owner", None).await;
    let plan_id = create_capped_plan(&state, "One Booking Plan", None, Some(1)).await;
    subscribe_owner(&state, owner_id, plan_id).await;
    let turf_a = create_test_turf(&state, owner_id, "Cap Arena A").await;
    let turf_b = create_test_turf(&state, owner_id, "Cap Arena B").await;

    let token = token_for(&state, owner_id, "owner@example.com", "turf_owner");
    let app = build_router(state);

    let booking = |turf_id: Uuid| {
        json!({
            "turf_id": turf_id,
            "date": "2026-09-12",
            "start_time": "10:00",
            "end_time": "11:00",
            "kind": "offline",
            "amount_cents": 150000,
            "status": "confirmed"
        })
    };

    let (status, _, _) = send(&app, post("/api/bookings", Some(&token), booking(turf_a))).await;
    assert_eq!(status, 201);

    // The cap is owner-wide: a second booking the same month on a
    // different turf must still hit it.
    let (status, body, _) = send(&app, post("/api/bookings", Some(&token), booking(turf_b))).await;
    assert_eq!(status, 403);
    assert_eq!(body["limit_reached"], true);
}

#[tokio::test]
async fn amount_edit_on_a_confirmed_booking_moves_player_spend_by_the_delta() {
    let Some(state) = db_state().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let owner_id = create_test_user(&state, &unique_email("owner"), "turf_owner", None).await;
    let plan_id = create_test_plan(&state, "Open Plan", None).await;
    subscribe_owner(&state, owner_id, plan_id).await;
    let turf_id = create_test_turf(&state, owner_id, "Delta Arena").await;

    let player_id: Uuid = sqlx::query_scalar(
        "INSERT INTO players (name, email) VALUES ('Delta Player', $1) RETURNING id",
    )
    .bind(unique_email("player"))
    .fetch_one(&state.db)
    .await
    .unwrap();

    let token = token_for(&state, owner_id, "owner@example.com", "turf_owner");
    let app = build_router(state.clone());

    let (status, body, _) = send(
        &app,
        post(
            "/api/bookings",
            Some(&token),
            json!({
                "turf_id": turf_id,
                "player_id": player_id,
                "date": "2026-09-08",
                "start_time": "18:00",
                "end_time": "19:00",
                "amount_cents": 100000,
                "status": "confirmed"
            }),
        ),
    )
    .await;
    assert_eq!(status, 201);
    let booking_id = body["id"].as_str().unwrap().to_string();

    let (status, _, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/bookings/{booking_id}"),
            Some(&token),
            Some(json!({ "amount_cents": 250000 })),
        ),
    )
    .await;
    assert_eq!(status, 200);

    let spent: i64 =
        sqlx::query_scalar("SELECT total_spent_cents FROM players WHERE id = $1")
            .bind(player_id)
            .fetch_one(&state.db)
            .await
            .unwrap();
    assert_eq!(spent, 250000);

    // Cancellation subtracts the edited amount, landing back at zero.
    let (status, _, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/bookings/{booking_id}"),
            Some(&token),
            Some(json!({ "status": "cancelled" })),
        ),
    )
    .await;
    assert_eq!(status, 200);

    let (count, spent): (i32, i64) = sqlx::query_as(
        "SELECT total_bookings, total_spent_cents FROM players WHERE id = $1",
    )
    .bind(player_id)
    .fetch_one(&state.db)
    .await
    .unwrap();
    assert_eq!(count, 0);
    assert_eq!(spent, 0);
}

#[tokio::test]
async fn future_dated_subscription_grants_no_limits_today() {
    let Some(state) = db_state().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let owner_id = create_test_user(&state, &unique_email("owner"), "turf_owner", None).await;
    let plan_id = create_test_plan(&state, "Open Plan", None).await;
    sqlx::query(
        r#"
        INSERT INTO subscriptions (owner_id, revenue_model_id, starts_on, ends_on,
                                   payment_status, is_active)
        VALUES ($1, $2, CURRENT_DATE + 10, CURRENT_DATE + 40, 'paid', true)
        "#,
    )
    .bind(owner_id)
    .bind(plan_id)
    .execute(&state.db)
    .await
    .unwrap();

    let token = token_for(&state, owner_id, "owner@example.com", "turf_owner");
    let app = build_router(state);

    let body = json!({ "name": "Early Arena", "price_per_hour_cents": 150000 });
    let (status, body, _) = send(&app, post("/api/turfs", Some(&token), body)).await;
    assert_eq!(status, 403);
    assert_eq!(body["limit_reached"], true);
}

#[tokio::test]
async fn turf_create_for_unknown_owner_is_404() {
    let Some(state) = db_state().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let admin_id = create_test_user(&state, &unique_email("admin"), "super_admin", None).await;
    let token = token_for(&state, admin_id, "admin@example.com", "super_admin");
    let app = build_router(state);

    let body = json!({
        "owner_id": Uuid::new_v4(),
        "name": "Ghost Arena",
        "price_per_hour_cents": 150000
    });
    let (status, _, _) = send(&app, post("/api/turfs", Some(&token), body)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn cancelling_a_confirmed_booking_rolls_back_player_counters() {
    let Some(state) = db_state().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let owner_id = create_test_user(&state, &unique_email("owner"), "turf_owner", None).await;
    let plan_id = create_test_plan(&state, "Open Plan", None).await;
    subscribe_owner(&state, owner_id, plan_id).await;
    let turf_id = create_test_turf(&state, owner_id, "Counter Arena").await;

    let player_id: Uuid = sqlx::query_scalar(
        "INSERT INTO players (name, email) VALUES ('Counter Player', $1) RETURNING id",
    )
    .bind(unique_email("player"))
    .fetch_one(&state.db)
    .await
    .unwrap();

    let token = token_for(&state, owner_id, "owner@example.com", "turf_owner");
    let app = build_router(state.clone());

    let (status, body, _) = send(
        &app,
        post(
            "/api/bookings",
            Some(&token),
            json!({
                "turf_id": turf_id,
                "player_id": player_id,
                "date": "2026-09-07",
                "start_time": "18:00",
                "end_time": "19:00",
                "amount_cents": 150000,
                "status": "confirmed"
            }),
        ),
    )
    .await;
    assert_eq!(status, 201);
    let booking_id = body["id"].as_str().unwrap().to_string();

    let (count, spent): (i32, i64) = sqlx::query_as(
        "SELECT total_bookings, total_spent_cents FROM players WHERE id = $1",
    )
    .bind(player_id)
    .fetch_one(&state.db)
    .await
    .unwrap();
    assert_eq!(count, 1);
    assert_eq!(spent, 150000);

    let (status, _, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/bookings/{booking_id}"),
            Some(&token),
            Some(json!({ "status": "cancelled" })),
        ),
    )
    .await;
    assert_eq!(status, 200);

    let (count, spent): (i32, i64) = sqlx::query_as(
        "SELECT total_bookings, total_spent_cents FROM players WHERE id = $1",
    )
    .bind(player_id)
    .fetch_one(&state.db)
    .await
    .unwrap();
    assert_eq!(count, 0);
    assert_eq!(spent, 0);
}
