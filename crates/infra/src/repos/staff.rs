use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::{db::Db, models::StaffRow, repos::GateOutcome};

const STAFF_COLUMNS: &str =
    "id, user_id, owner_id, job_title, salary_cents, shift, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateStaff {
    pub owner_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub job_title: String,
    pub salary_cents: i64,
    pub shift: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateStaff {
    pub job_title: Option<String>,
    pub salary_cents: Option<i64>,
    pub shift: Option<String>,
}

#[derive(Clone)]
pub struct StaffRepo {
    pool: Db,
}

impl StaffRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    /// Create a staff member plus their login account, under the owner's
    /// plan limit. Owner row lock serializes concurrent creates; the user
    /// and staff inserts commit together.
    pub async fn create_gated(
        &self,
        data: CreateStaff,
        max_staff: Option<i64>,
    ) -> SqlxResult<GateOutcome<StaffRow>> {
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
            sqlx::query_scalar("SELECT COUNT(*) FROM staff WHERE owner_id = $1")
                .bind(data.owner_id)
                .fetch_one(&mut *tx)
                .await?;

        if let Some(max) = max_staff {
            if current >= max {
                tx.rollback().await?;
                return Ok(GateOutcome::LimitReached { current, max });
            }
        }

        let user_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash, name, phone, role, owner_id)
            VALUES ($1, $2, $3, $4, 'staff', $5)
            RETURNING id
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.phone)
        .bind(data.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, StaffRow>(&format!(
            r#"
            INSERT INTO staff (user_id, owner_id, job_title, salary_cents, shift)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {STAFF_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(data.owner_id)
        .bind(data.job_title)
        .bind(data.salary_cents)
        .bind(data.shift)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(GateOutcome::Created(row))
    }

    pub async fn get(&self, id: Uuid) -> SqlxResult<Option<StaffRow>> {
        sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> SqlxResult<Vec<StaffRow>> {
        sqlx::query_as::<_, StaffRow>(&format!(
            r#"
            SELECT {STAFF_COLUMNS}
            FROM staff
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn list_all(&self) -> SqlxResult<Vec<StaffRow>> {
        sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    pub async fn update(&self, id: Uuid, data: UpdateStaff) -> SqlxResult<Option<StaffRow>> {
        sqlx::query_as::<_, StaffRow>(&format!(
            r#"
            UPDATE staff
            SET job_title = COALESCE($2, job_title),
                salary_cents = COALESCE($3, salary_cents),
                shift = COALESCE($4, shift),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STAFF_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.job_title)
        .bind(data.salary_cents)
        .bind(data.shift)
        .fetch_optional(&self.pool)
        .await
    }

    /// Remove a staff member and their login account.
    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM staff WHERE id = $1 RETURNING user_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(user_id) = user_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn count_for_owner(&self, owner_id: Uuid) -> SqlxResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM staff WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
    }
}
