use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::{db::Db, models::TurfRow, pagination::LimitOffset, repos::GateOutcome};

const TURF_COLUMNS: &str = "id, owner_id, name, description, location, price_per_hour_cents, \
     capacity, has_floodlights, has_parking, has_changing_rooms, open_hour, close_hour, \
     is_active, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct TurfFilter {
    pub owner_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CreateTurf {
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_hour_cents: i64,
    pub capacity: i32,
    pub has_floodlights: bool,
    pub has_parking: bool,
    pub has_changing_rooms: bool,
    pub open_hour: i32,
    pub close_hour: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTurf {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_hour_cents: Option<i64>,
    pub capacity: Option<i32>,
    pub has_floodlights: Option<bool>,
    pub has_parking: Option<bool>,
    pub has_changing_rooms: Option<bool>,
    pub open_hour: Option<i32>,
    pub close_hour: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct TurfRepo {
    pool: Db,
}

impl TurfRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    /// Create a turf, holding the owner's plan limit. The owner row is
    /// locked for the duration so two concurrent creates serialize on the
    /// count check. `max_turfs: None` means the plan is unlimited.
    pub async fn create_gated(
        &self,
        data: CreateTurf,
        max_turfs: Option<i64>,
    ) -> SqlxResult<GateOutcome<TurfRow>> {
        let mut tx = self.pool.begin().await?;

        let owner: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(data.owner_id)
                .fetch_optional(&mut *tx)
                .await?;
        if owner.is_none() {
            tx.rollback().await?;
            return Ok(GateOutcome::OwnerNotFound);
        }

        let current: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM turfs WHERE owner_id = $1")
                .bind(data.owner_id)
                .fetch_one(&mut *tx)
                .await?;

        if let Some(max) = max_turfs {
            if current >= max {
                tx.rollback().await?;
                return Ok(GateOutcome::LimitReached { current, max });
            }
        }

        let row = sqlx::query_as::<_, TurfRow>(&format!(
            r#"
            INSERT INTO turfs (owner_id, name, description, location, price_per_hour_cents,
                               capacity, has_floodlights, has_parking, has_changing_rooms,
                               open_hour, close_hour)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {TURF_COLUMNS}
            "#
        ))
        .bind(data.owner_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.location)
        .bind(data.price_per_hour_cents)
        .bind(data.capacity)
        .bind(data.has_floodlights)
        .bind(data.has_parking)
        .bind(data.has_changing_rooms)
        .bind(data.open_hour)
        .bind(data.close_hour)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(GateOutcome::Created(row))
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<TurfRow>> {
        sqlx::query_as::<_, TurfRow>(&format!(
            "SELECT {TURF_COLUMNS} FROM turfs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list(
        &self,
        filter: TurfFilter,
        page: Option<LimitOffset>,
    ) -> SqlxResult<Vec<TurfRow>> {
        let p = page.unwrap_or_default();

        // COALESCE-style null filters keep this a single prepared statement.
        sqlx::query_as::<_, TurfRow>(&format!(
            r#"
            SELECT {TURF_COLUMNS}
            FROM turfs
            WHERE ($1::uuid IS NULL OR owner_id = $1)
              AND ($2::boolean IS NULL OR is_active = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.owner_id)
        .bind(filter.is_active)
        .bind(p.limit)
        .bind(p.offset)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn update(&self, id: Uuid, data: UpdateTurf) -> SqlxResult<Option<TurfRow>> {
        sqlx::query_as::<_, TurfRow>(&format!(
            r#"
            UPDATE turfs
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                price_per_hour_cents = COALESCE($5, price_per_hour_cents),
                capacity = COALESCE($6, capacity),
                has_floodlights = COALESCE($7, has_floodlights),
                has_parking = COALESCE($8, has_parking),
                has_changing_rooms = COALESCE($9, has_changing_rooms),
                open_hour = COALESCE($10, open_hour),
                close_hour = COALESCE($11, close_hour),
                is_active = COALESCE($12, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TURF_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.location)
        .bind(data.price_per_hour_cents)
        .bind(data.capacity)
        .bind(data.has_floodlights)
        .bind(data.has_parking)
        .bind(data.has_changing_rooms)
        .bind(data.open_hour)
        .bind(data.close_hour)
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let result = sqlx::query("DELETE FROM turfs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_for_owner(&self, owner_id: Uuid) -> SqlxResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM turfs WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
    }
}
