use chrono::NaiveDate;
use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::{
    db::Db,
    models::{RevenueModelRow, SubscriptionRow},
};

const SUB_COLUMNS: &str = "id, owner_id, revenue_model_id, starts_on, ends_on, \
     payment_status, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateSubscription {
    pub owner_id: Uuid,
    pub revenue_model_id: Uuid,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub payment_status: String,
}

#[derive(Clone)]
pub struct SubscriptionRepo {
    pool: Db,
}

impl SubscriptionRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    /// Start a subscription, retiring any currently active one for the
    /// owner in the same transaction (at most one active per owner; the
    /// partial unique index backs this up).
    pub async fn subscribe(&self, data: CreateSubscription) -> SqlxResult<SubscriptionRow> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE subscriptions
            SET is_active = false, updated_at = NOW()
            WHERE owner_id = $1 AND is_active
            "#,
        )
        .bind(data.owner_id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
            r#"
            INSERT INTO subscriptions (owner_id, revenue_model_id, starts_on, ends_on,
                                       payment_status, is_active)
            VALUES ($1, $2, $3, $4, $5, true)
            RETURNING {SUB_COLUMNS}
            "#
        ))
        .bind(data.owner_id)
        .bind(data.revenue_model_id)
        .bind(data.starts_on)
        .bind(data.ends_on)
        .bind(&data.payment_status)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO notifications (user_id, title, body) VALUES ($1, $2, $3)")
            .bind(data.owner_id)
            .bind("Subscription active")
            .bind(format!(
                "Your subscription runs {} to {}",
                row.starts_on, row.ends_on
            ))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<SubscriptionRow>> {
        sqlx::query_as::<_, SubscriptionRow>(&format!(
            "SELECT {SUB_COLUMNS} FROM subscriptions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_all(&self) -> SqlxResult<Vec<SubscriptionRow>> {
        sqlx::query_as::<_, SubscriptionRow>(&format!(
            "SELECT {SUB_COLUMNS} FROM subscriptions ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> SqlxResult<Vec<SubscriptionRow>> {
        sqlx::query_as::<_, SubscriptionRow>(&format!(
            r#"
            SELECT {SUB_COLUMNS}
            FROM subscriptions
            WHERE owner_id = $1
            ORDER BY starts_on DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn active_for_owner(&self, owner_id: Uuid) -> SqlxResult<Option<SubscriptionRow>> {
        sqlx::query_as::<_, SubscriptionRow>(&format!(
            r#"
            SELECT {SUB_COLUMNS}
            FROM subscriptions
            WHERE owner_id = $1 AND is_active
              AND starts_on <= CURRENT_DATE AND ends_on >= CURRENT_DATE
            "#
        ))
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// The revenue model behind the owner's active subscription, if any.
    pub async fn active_plan_for_owner(
        &self,
        owner_id: Uuid,
    ) -> SqlxResult<Option<RevenueModelRow>> {
        sqlx::query_as::<_, RevenueModelRow>(
            r#"
            SELECT rm.id, rm.name, rm.description, rm.monthly_price_cents,
                   rm.yearly_price_cents, rm.max_turfs, rm.max_staff,
                   rm.max_bookings_per_month, rm.commission_bps, rm.is_active,
                   rm.created_at, rm.updated_at
            FROM subscriptions s
            JOIN revenue_models rm ON rm.id = s.revenue_model_id
            WHERE s.owner_id = $1 AND s.is_active
              AND s.starts_on <= CURRENT_DATE AND s.ends_on >= CURRENT_DATE
            "#,
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn set_payment_status(
        &self,
        id: Uuid,
        payment_status: &str,
    ) -> SqlxResult<Option<SubscriptionRow>> {
        sqlx::query_as::<_, SubscriptionRow>(&format!(
            r#"
            UPDATE subscriptions
            SET payment_status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {SUB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payment_status)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
