use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: Uuid,
    pub note_id: Uuid,
    pub remind_at: OffsetDateTime,
    pub is_triggered: bool,
    pub created_at: OffsetDateTime,
}

impl Reminder {
    pub async fn create(
        db: &PgPool,
        note_id: Uuid,
        remind_at: OffsetDateTime,
    ) -> anyhow::Result<Reminder> {
        let reminder = sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (note_id, remind_at)
            VALUES ($1, $2)
            RETURNING id, note_id, remind_at, is_triggered, created_at
            "#,
        )
        .bind(note_id)
        .bind(remind_at)
        .fetch_one(db)
        .await?;
        Ok(reminder)
    }

    pub async fn list_by_note(db: &PgPool, note_id: Uuid) -> anyhow::Result<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT id, note_id, remind_at, is_triggered, created_at
            FROM reminders
            WHERE note_id = $1
            ORDER BY remind_at ASC
            "#,
        )
        .bind(note_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Untriggered future reminders across all of a user's notes, soonest
    /// first.
    pub async fn list_upcoming_by_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT r.id, r.note_id, r.remind_at, r.is_triggered, r.created_at
            FROM reminders r
            JOIN notes n ON n.id = r.note_id
            WHERE n.user_id = $1 AND r.is_triggered = false AND r.remind_at > now()
            ORDER BY r.remind_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Delete a reminder, but only when it hangs off one of the caller's
    /// notes.
    pub async fn delete_for_user(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM reminders r
            USING notes n
            WHERE r.id = $1 AND n.id = r.note_id AND n.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
