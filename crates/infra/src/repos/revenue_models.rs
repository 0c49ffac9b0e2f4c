use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::{db::Db, models::RevenueModelRow};

const PLAN_COLUMNS: &str = "id, name, description, monthly_price_cents, yearly_price_cents, \
     max_turfs, max_staff, max_bookings_per_month, commission_bps, is_active, created_at, \
     updated_at";

#[derive(Debug, Clone)]
pub struct CreateRevenueModel {
    pub name: String,
    pub description: Option<String>,
    pub monthly_price_cents: i64,
    pub yearly_price_cents: i64,
    pub max_turfs: Option<i32>,
    pub max_staff: Option<i32>,
    pub max_bookings_per_month: Option<i32>,
    pub commission_bps: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateRevenueModel {
    pub name: Option<String>,
    pub description: Option<String>,
    pub monthly_price_cents: Option<i64>,
    pub yearly_price_cents: Option<i64>,
    pub commission_bps: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct RevenueModelRepo {
    pool: Db,
}

impl RevenueModelRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list(&self, only_active: bool) -> SqlxResult<Vec<RevenueModelRow>> {
        sqlx::query_as::<_, RevenueModelRow>(&format!(
            r#"
            SELECT {PLAN_COLUMNS}
            FROM revenue_models
            WHERE ($1 = false OR is_active)
            ORDER BY monthly_price_cents ASC
            "#
        ))
        .bind(only_active)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<RevenueModelRow>> {
        sqlx::query_as::<_, RevenueModelRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM revenue_models WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(&self, data: CreateRevenueModel) -> SqlxResult<RevenueModelRow> {
        sqlx::query_as::<_, RevenueModelRow>(&format!(
            r#"
            INSERT INTO revenue_models (name, description, monthly_price_cents,
                                        yearly_price_cents, max_turfs, max_staff,
                                        max_bookings_per_month, commission_bps)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.monthly_price_cents)
        .bind(data.yearly_price_cents)
        .bind(data.max_turfs)
        .bind(data.max_staff)
        .bind(data.max_bookings_per_month)
        .bind(data.commission_bps)
        .fetch_one(&self.pool)
        .await
    }

    /// Limits are immutable once a plan exists; owners subscribed to a plan
    /// keep the caps they signed up for. Price/flag edits only.
    pub async fn update(
        &self,
        id: Uuid,
        data: UpdateRevenueModel,
    ) -> SqlxResult<Option<RevenueModelRow>> {
        sqlx::query_as::<_, RevenueModelRow>(&format!(
            r#"
            UPDATE revenue_models
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                monthly_price_cents = COALESCE($4, monthly_price_cents),
                yearly_price_cents = COALESCE($5, yearly_price_cents),
                commission_bps = COALESCE($6, commission_bps),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.monthly_price_cents)
        .bind(data.yearly_price_cents)
        .bind(data.commission_bps)
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM revenue_models WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
