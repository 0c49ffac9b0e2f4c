mod common;

use api::app::build_router;
use common::*;
use serde_json::json;
use uuid::Uuid;

fn unique_email(prefix: &str) -> String {
    format!("{prefix}+{}@example.com", Uuid::new_v4())
}

#[tokio::test]
async fn owner_stats_reflect_their_bookings_and_admin_view_covers_them() {
    let Some(state) = db_state().await else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return;
    };

    let owner_id = create_test_user(&state, &unique_email("owner"), "turf_owner", None).await;
    let admin_id = create_test_user(&state, &unique_email("admin"), "super_admin", None).await;
    let plan_id = create_test_plan(&state, "Stats Plan", None).await;
    subscribe_owner(&state, owner_id, plan_id).await;
    let turf_id = create_test_turf(&state, owner_id, "Stats Arena").await;

    let owner_token = token_for(&state, owner_id, "owner@example.com", "turf_owner");
    let admin_token = token_for(&state, admin_id, "admin@example.com", "super_admin");
    let app = build_router(state);

    for (start, end, status) in [
        ("08:00", "09:00", "confirmed"),
        ("09:00", "10:00", "confirmed"),
        ("10:00", "11:00", "pending"),
    ] {
        let (code, _, _) = send(
            &app,
            post(
                "/api/bookings",
                Some(&owner_token),
                json!({
                    "turf_id": turf_id,
                    "date": "2026-09-10",
                    "start_time": start,
                    "end_time": end,
                    "kind": "offline",
                    "amount_cents": 100000,
                    "status": status
                }),
            ),
        )
        .await;
        assert_eq!(code, 201);
    }

    let (status, owner_stats, _) = send(&app, get("/api/bookings-stats", Some(&owner_token))).await;
    assert_eq!(status, 200);
    assert_eq!(owner_stats["confirmed"], 2);
    assert_eq!(owner_stats["pending"], 1);
    assert_eq!(owner_stats["revenue_cents"], 200000);

    // The platform view aggregates every owner, so it is at least as large
    // as any single tenant's block for every metric.
    let (status, admin_stats, _) = send(&app, get("/api/bookings-stats", Some(&admin_token))).await;
    assert_eq!(status, 200);
    assert!(admin_stats["confirmed"].as_i64() >= owner_stats["confirmed"].as_i64());
    assert!(admin_stats["revenue_cents"].as_i64() >= owner_stats["revenue_cents"].as_i64());

    let (status, dash, _) = send(&app, get("/api/dashboard/stats", Some(&owner_token))).await;
    assert_eq!(status, 200);
    assert_eq!(dash["turfs"]["total_turfs"], 1);
    assert_eq!(dash["bookings"]["revenue_cents"], 200000);
    assert_eq!(dash["active_subscriptions"], 1);
}
