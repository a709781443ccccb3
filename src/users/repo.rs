use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Closed role set. Registration without an explicit role gets the
/// least-privileged one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    User,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// One login-capable account.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = "id, name, email, password_hash, role, is_active, created_at, updated_at";

impl Account {
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(&format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        is_active: bool,
    ) -> Result<Account, sqlx::Error> {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(is_active)
        .fetch_one(db)
        .await
    }

    /// Newest-first page of non-admin accounts, name/email searched
    /// case-insensitively.
    pub async fn list(
        db: &PgPool,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            SELECT {COLUMNS} FROM users
            WHERE role <> 'admin' AND (name ILIKE $1 OR email ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn count(db: &PgPool, pattern: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE role <> 'admin' AND (name ILIKE $1 OR email ILIKE $1)
            "#,
        )
        .bind(pattern)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        email: &str,
        role: Role,
        is_active: bool,
    ) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, role = $4, is_active = $5, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(role)
        .bind(is_active)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
