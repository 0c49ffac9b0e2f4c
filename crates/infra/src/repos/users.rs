use sqlx::{Result, QueryBuilder};
use uuid::Uuid;

use crate::{db::Db, models::UserRow, pagination::LimitOffset};

const USER_COLUMNS: &str =
    "id, email, password_hash, name, phone, role, owner_id, is_active, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: String,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

pub struct UserRepo {
    db: Db,
}

impl UserRepo {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: UserFilter, page: Option<LimitOffset>) -> Result<Vec<UserRow>> {
        let page = page.unwrap_or_default();

        let mut query = QueryBuilder::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE 1=1"
        ));

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query.push(" AND (LOWER(name) LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR LOWER(email) LIKE ");
            query.push_bind(pattern);
            query.push(")");
        }

        if let Some(role) = &filter.role {
            query.push(" AND role = ");
            query.push_bind(role.clone());
        }

        if let Some(is_active) = filter.is_active {
            query.push(" AND is_active = ");
            query.push_bind(is_active);
        }

        query.push(" ORDER BY created_at DESC");
        query.push(" LIMIT ");
        query.push_bind(page.limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset);

        query.build_query_as::<UserRow>().fetch_all(&self.db).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<UserRow>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn create(&self, data: CreateUser) -> Result<UserRow> {
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, password_hash, name, phone, role, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.phone)
        .bind(data.role)
        .bind(data.owner_id)
        .fetch_one(&self.db)
        .await
    }

    pub async fn update(&self, id: Uuid, data: UpdateUser) -> Result<Option<UserRow>> {
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                password_hash = COALESCE($4, password_hash),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.phone)
        .bind(data.password_hash)
        .bind(data.is_active)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
