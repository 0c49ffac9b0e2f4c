use sqlx::Result as SqlxResult;
use uuid::Uuid;

use crate::{db::Db, models::NotificationRow, pagination::LimitOffset};

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, body, read_at, created_at";

#[derive(Clone)]
pub struct NotificationRepo {
    pool: Db,
}

impl NotificationRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, title: &str, body: &str) -> SqlxResult<NotificationRow> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            INSERT INTO notifications (user_id, title, body)
            VALUES ($1, $2, $3)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(title)
        .bind(body)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        page: Option<LimitOffset>,
    ) -> SqlxResult<Vec<NotificationRow>> {
        let p = page.unwrap_or_default();

        sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(p.limit)
        .bind(p.offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Mark read; scoped to the recipient so users cannot touch each
    /// other's feeds.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> SqlxResult<Option<NotificationRow>> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            UPDATE notifications
            SET read_at = COALESCE(read_at, NOW())
            WHERE id = $1 AND user_id = $2
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn unread_count(&self, user_id: Uuid) -> SqlxResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }
}
