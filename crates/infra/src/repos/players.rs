use sqlx::{QueryBuilder, Result};
use uuid::Uuid;

use crate::{db::Db, models::PlayerRow, pagination::LimitOffset};

const PLAYER_COLUMNS: &str =
    "id, name, email, phone, total_bookings, total_spent_cents, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreatePlayer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePlayer {
    pub name: Option<String>,
    pub phone: Option<String>,
}

pub struct PlayerRepo {
    db: Db,
}

impl PlayerRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        search: Option<String>,
        page: Option<LimitOffset>,
    ) -> Result<Vec<PlayerRow>> {
        let page = page.unwrap_or_default();

        let mut query = QueryBuilder::new(format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE 1=1"
        ));

        if let Some(search) = &search {
            let pattern = format!("%{}%", search.to_lowercase());
            query.push(" AND (LOWER(name) LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR LOWER(email) LIKE ");
            query.push_bind(pattern);
            query.push(")");
        }

        query.push(" ORDER BY created_at DESC");
        query.push(" LIMIT ");
        query.push_bind(page.limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset);

        query.build_query_as::<PlayerRow>().fetch_all(&self.db).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<PlayerRow>> {
        sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<PlayerRow>> {
        sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn create(&self, data: CreatePlayer) -> Result<PlayerRow> {
        sqlx::query_as::<_, PlayerRow>(&format!(
            r#"
            INSERT INTO players (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING {PLAYER_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .fetch_one(&self.db)
        .await
    }

    pub async fn update(&self, id: Uuid, data: UpdatePlayer) -> Result<Option<PlayerRow>> {
        sqlx::query_as::<_, PlayerRow>(&format!(
            r#"
            UPDATE players
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PLAYER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.phone)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
