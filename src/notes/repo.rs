use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub image_urls: Json<Vec<String>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const NOTE_COLUMNS: &str = "id, user_id, title, content, image_urls, created_at, updated_at";

impl Note {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        content: Option<&str>,
        image_urls: &[String],
    ) -> anyhow::Result<Note> {
        let note = sqlx::query_as::<_, Note>(&format!(
            r#"
            INSERT INTO notes (user_id, title, content, image_urls)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTE_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(Json(image_urls))
        .fetch_one(db)
        .await?;
        Ok(note)
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Note>> {
        let rows = sqlx::query_as::<_, Note>(&format!(
            r#"
            SELECT {NOTE_COLUMNS}
            FROM notes
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(&format!(
            r#"
            SELECT {NOTE_COLUMNS}
            FROM notes
            WHERE id = $1 AND user_id = $2
            "#,
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(note)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        title: &str,
        content: Option<&str>,
        image_urls: &[String],
    ) -> anyhow::Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(&format!(
            r#"
            UPDATE notes
            SET title = $3, content = $4, image_urls = $5, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {NOTE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(Json(image_urls))
        .fetch_optional(db)
        .await?;
        Ok(note)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM notes WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive title substring search within one user's notes.
    pub async fn search_by_title(
        db: &PgPool,
        user_id: Uuid,
        term: &str,
    ) -> anyhow::Result<Vec<Note>> {
        let rows = sqlx::query_as::<_, Note>(&format!(
            r#"
            SELECT {NOTE_COLUMNS}
            FROM notes
            WHERE user_id = $1 AND title ILIKE '%' || $2 || '%'
            ORDER BY created_at DESC
            "#,
        ))
        .bind(user_id)
        .bind(term)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
