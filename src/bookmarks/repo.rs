use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Bookmark record in the database. Soft-deleted rows keep their id so a
/// re-add of the same url revives them in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub screenshot: Option<String>,
    pub tags: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl Bookmark {
    /// Active bookmarks for an owner, most recently touched first.
    pub async fn list_active(db: &PgPool, owner: Uuid) -> anyhow::Result<Vec<Bookmark>> {
        let rows = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, url, title, description, screenshot, tags,
                   created_at, updated_at, deleted_at
            FROM bookmarks
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY updated_at DESC, created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Owner-scoped lookup of a single active bookmark.
    pub async fn find_active(
        db: &PgPool,
        owner: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Bookmark>> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, url, title, description, screenshot, tags,
                   created_at, updated_at, deleted_at
            FROM bookmarks
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(db)
        .await?;
        Ok(bookmark)
    }

    /// Atomic insert-or-revive keyed on (owner, url). A fresh row starts
    /// with bare metadata; a conflicting row, soft-deleted or not, is
    /// revived in place and keeps its id and metadata.
    pub async fn upsert(db: &PgPool, owner: Uuid, url: &str) -> anyhow::Result<Bookmark> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (user_id, url)
            VALUES ($1, $2)
            ON CONFLICT (user_id, url)
            DO UPDATE SET deleted_at = NULL, updated_at = now()
            RETURNING id, user_id, url, title, description, screenshot, tags,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(owner)
        .bind(url)
        .fetch_one(db)
        .await?;
        Ok(bookmark)
    }

    /// Soft delete. Returns false when no active row matched.
    pub async fn soft_delete(db: &PgPool, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bookmarks
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply fetched page metadata. A row deleted while the fetch was in
    /// flight is left alone.
    pub async fn set_metadata(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE bookmarks
            SET title = $2, description = $3, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .execute(db)
        .await?;
        Ok(())
    }
}
