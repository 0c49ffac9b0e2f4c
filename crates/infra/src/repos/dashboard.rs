use serde::Serialize;
use sqlx::{FromRow, Result as SqlxResult};
use uuid::Uuid;

use crate::db::Db;

/// Aggregate blocks for the dashboard endpoints. Every query takes an
/// optional owner scope: `None` is the platform-wide (super_admin) view,
/// which therefore equals the sum of the per-owner views by construction.
#[derive(Clone)]
pub struct DashboardRepo {
    pool: Db,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TurfStats {
    pub total_turfs: i64,
    pub active_turfs: i64,
    pub avg_price_per_hour_cents: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingStats {
    pub total_bookings: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
    pub online: i64,
    pub offline: i64,
    pub revenue_cents: i64,
    pub today_revenue_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub turfs: TurfStats,
    pub bookings: BookingStats,
    pub staff_count: i64,
    /// Platform view only; zero in the owner view.
    pub owner_count: i64,
    pub active_subscriptions: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MonthlyRevenue {
    pub month: String,
    pub bookings: i64,
    pub revenue_cents: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TopTurf {
    pub turf_id: Uuid,
    pub name: String,
    pub bookings: i64,
    pub revenue_cents: i64,
}

impl DashboardRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn turf_stats(&self, owner_id: Option<Uuid>) -> SqlxResult<TurfStats> {
        sqlx::query_as::<_, TurfStats>(
            r#"
            SELECT COUNT(*) AS total_turfs,
                   COUNT(*) FILTER (WHERE is_active) AS active_turfs,
                   COALESCE(AVG(price_per_hour_cents), 0)::bigint AS avg_price_per_hour_cents
            FROM turfs
            WHERE ($1::uuid IS NULL OR owner_id = $1)
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn booking_stats(&self, owner_id: Option<Uuid>) -> SqlxResult<BookingStats> {
        sqlx::query_as::<_, BookingStats>(
            r#"
            SELECT COUNT(*) AS total_bookings,
                   COUNT(*) FILTER (WHERE b.status = 'pending') AS pending,
                   COUNT(*) FILTER (WHERE b.status = 'confirmed') AS confirmed,
                   COUNT(*) FILTER (WHERE b.status = 'cancelled') AS cancelled,
                   COUNT(*) FILTER (WHERE b.kind = 'online') AS online,
                   COUNT(*) FILTER (WHERE b.kind = 'offline') AS offline,
                   COALESCE(SUM(b.amount_cents) FILTER (WHERE b.status = 'confirmed'), 0)::bigint
                       AS revenue_cents,
                   COALESCE(SUM(b.amount_cents) FILTER (WHERE b.status = 'confirmed'
                       AND b.booked_on = CURRENT_DATE), 0)::bigint AS today_revenue_cents
            FROM bookings b
            JOIN turfs t ON t.id = b.turf_id
            WHERE ($1::uuid IS NULL OR t.owner_id = $1)
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn stats(&self, owner_id: Option<Uuid>) -> SqlxResult<DashboardStats> {
        let turfs = self.turf_stats(owner_id).await?;
        let bookings = self.booking_stats(owner_id).await?;

        let staff_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM staff WHERE ($1::uuid IS NULL OR owner_id = $1)",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        let owner_count: i64 = match owner_id {
            Some(_) => 0,
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'turf_owner'")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        let active_subscriptions: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM subscriptions
            WHERE is_active AND ends_on >= CURRENT_DATE
              AND ($1::uuid IS NULL OR owner_id = $1)
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            turfs,
            bookings,
            staff_count,
            owner_count,
            active_subscriptions,
        })
    }

    /// Confirmed revenue bucketed by calendar month, most recent first.
    pub async fn revenue_by_month(
        &self,
        owner_id: Option<Uuid>,
        months: i32,
    ) -> SqlxResult<Vec<MonthlyRevenue>> {
        sqlx::query_as::<_, MonthlyRevenue>(
            r#"
            SELECT to_char(date_trunc('month', b.booked_on), 'YYYY-MM') AS month,
                   COUNT(*) AS bookings,
                   COALESCE(SUM(b.amount_cents), 0)::bigint AS revenue_cents
            FROM bookings b
            JOIN turfs t ON t.id = b.turf_id
            WHERE b.status = 'confirmed'
              AND b.booked_on >= date_trunc('month', CURRENT_DATE) - make_interval(months => $2)
              AND ($1::uuid IS NULL OR t.owner_id = $1)
            GROUP BY 1
            ORDER BY 1 DESC
            "#,
        )
        .bind(owner_id)
        .bind(months)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn top_turfs(&self, owner_id: Option<Uuid>, limit: i64) -> SqlxResult<Vec<TopTurf>> {
        sqlx::query_as::<_, TopTurf>(
            r#"
            SELECT t.id AS turf_id,
                   t.name,
                   COUNT(b.id) AS bookings,
                   COALESCE(SUM(b.amount_cents) FILTER (WHERE b.status = 'confirmed'), 0)::bigint
                       AS revenue_cents
            FROM turfs t
            LEFT JOIN bookings b ON b.turf_id = t.id
            WHERE ($1::uuid IS NULL OR t.owner_id = $1)
            GROUP BY t.id, t.name
            ORDER BY revenue_cents DESC
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
