use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// Catalog gift. Gifts are global; lists hold references to them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Gift {
    pub id: Uuid,
    pub name: String,
    pub price: String, // price range label, e.g. "$0-$20"
    pub holiday: String,
    pub recipient: String,
    pub description: String,
    pub link: String,
    pub image: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewGift<'a> {
    pub name: &'a str,
    pub price: &'a str,
    pub holiday: &'a str,
    pub recipient: &'a str,
    pub description: &'a str,
    pub link: &'a str,
    pub image: &'a str,
}

impl Gift {
    pub async fn create(db: &PgPool, new: NewGift<'_>) -> Result<Gift, ApiError> {
        let gift = sqlx::query_as::<_, Gift>(
            r#"
            INSERT INTO gifts (name, price, holiday, recipient, description, link, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, price, holiday, recipient, description, link, image, created_at
            "#,
        )
        .bind(new.name)
        .bind(new.price)
        .bind(new.holiday)
        .bind(new.recipient)
        .bind(new.description)
        .bind(new.link)
        .bind(new.image)
        .fetch_one(db)
        .await?;
        Ok(gift)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> Result<Option<Gift>, ApiError> {
        let gift = sqlx::query_as::<_, Gift>(
            r#"
            SELECT id, name, price, holiday, recipient, description, link, image, created_at
            FROM gifts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(gift)
    }

    /// Search the catalog. Every filter is optional; an omitted filter
    /// matches everything, `name` matches as a substring.
    pub async fn search(
        db: &PgPool,
        holiday: Option<&str>,
        recipient: Option<&str>,
        price: Option<&str>,
        name: Option<&str>,
    ) -> Result<Vec<Gift>, ApiError> {
        let gifts = sqlx::query_as::<_, Gift>(
            r#"
            SELECT id, name, price, holiday, recipient, description, link, image, created_at
            FROM gifts
            WHERE ($1::text IS NULL OR holiday = $1)
              AND ($2::text IS NULL OR recipient = $2)
              AND ($3::text IS NULL OR price = $3)
              AND ($4::text IS NULL OR name ILIKE '%' || $4 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(holiday)
        .bind(recipient)
        .bind(price)
        .bind(name)
        .fetch_all(db)
        .await?;
        Ok(gifts)
    }

    /// Short preview for the landing-page carousel.
    pub async fn carousel(
        db: &PgPool,
        holiday: &str,
        recipient: &str,
    ) -> Result<Vec<Gift>, ApiError> {
        let gifts = sqlx::query_as::<_, Gift>(
            r#"
            SELECT id, name, price, holiday, recipient, description, link, image, created_at
            FROM gifts
            WHERE holiday = $1 AND recipient = $2
            ORDER BY created_at DESC
            LIMIT 10
            "#,
        )
        .bind(holiday)
        .bind(recipient)
        .fetch_all(db)
        .await?;
        Ok(gifts)
    }
}
