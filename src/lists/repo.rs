use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::gifts::repo::Gift;

/// Gift list owned by a user. Every query here scopes by `user_id`, so one
/// account can never see or touch another account's lists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct List {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: OffsetDateTime,
}

impl List {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<List>, ApiError> {
        let lists = sqlx::query_as::<_, List>(
            r#"
            SELECT id, user_id, title, created_at
            FROM lists
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(lists)
    }

    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        list_id: Uuid,
    ) -> Result<Option<List>, ApiError> {
        let list = sqlx::query_as::<_, List>(
            r#"
            SELECT id, user_id, title, created_at
            FROM lists
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(list_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(list)
    }

    pub async fn create(db: &PgPool, user_id: Uuid, title: &str) -> Result<List, ApiError> {
        let list = sqlx::query_as::<_, List>(
            r#"
            INSERT INTO lists (user_id, title)
            VALUES ($1, $2)
            RETURNING id, user_id, title, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(db)
        .await?;
        Ok(list)
    }

    pub async fn rename(
        db: &PgPool,
        user_id: Uuid,
        list_id: Uuid,
        title: &str,
    ) -> Result<Option<List>, ApiError> {
        let list = sqlx::query_as::<_, List>(
            r#"
            UPDATE lists
            SET title = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, created_at
            "#,
        )
        .bind(list_id)
        .bind(user_id)
        .bind(title)
        .fetch_optional(db)
        .await?;
        Ok(list)
    }

    /// Delete by id, scoped to the owner. Returns false when nothing matched.
    pub async fn delete(db: &PgPool, user_id: Uuid, list_id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query(
            r#"
            DELETE FROM lists
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(list_id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn gifts(db: &PgPool, list_id: Uuid) -> Result<Vec<Gift>, ApiError> {
        let gifts = sqlx::query_as::<_, Gift>(
            r#"
            SELECT g.id, g.name, g.price, g.holiday, g.recipient, g.description,
                   g.link, g.image, g.created_at
            FROM gifts g
            JOIN list_gifts lg ON lg.gift_id = g.id
            WHERE lg.list_id = $1
            ORDER BY lg.added_at ASC
            "#,
        )
        .bind(list_id)
        .fetch_all(db)
        .await?;
        Ok(gifts)
    }

    /// Adding the same gift twice is a no-op.
    pub async fn add_gift(db: &PgPool, list_id: Uuid, gift_id: Uuid) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO list_gifts (list_id, gift_id)
            VALUES ($1, $2)
            ON CONFLICT (list_id, gift_id) DO NOTHING
            "#,
        )
        .bind(list_id)
        .bind(gift_id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn remove_gift(
        db: &PgPool,
        list_id: Uuid,
        gift_id: Uuid,
    ) -> Result<bool, ApiError> {
        let result = sqlx::query(
            r#"
            DELETE FROM list_gifts
            WHERE list_id = $1 AND gift_id = $2
            "#,
        )
        .bind(list_id)
        .bind(gift_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
