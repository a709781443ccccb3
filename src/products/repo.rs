use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = "id, name, description, price, image_url, created_at, updated_at";

impl Product {
    pub async fn create(
        db: &PgPool,
        name: &str,
        description: &str,
        price: f64,
        image_url: Option<&str>,
    ) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, price, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(image_url)
        .fetch_one(db)
        .await
    }

    pub async fn list(
        db: &PgPool,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {COLUMNS} FROM products
            WHERE name ILIKE $1 OR description ILIKE $1
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
            "SELECT COUNT(*) FROM products WHERE name ILIKE $1 OR description ILIKE $1",
        )
        .bind(pattern)
        .fetch_one(db)
        .await
    }

    /// Image url is left untouched when the update does not supply one.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        description: &str,
        price: f64,
        image_url: Option<&str>,
    ) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4,
                image_url = COALESCE($5, image_url), updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(image_url)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
