use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::reminders::repo::Reminder;

/// Request body for scheduling a reminder on a note.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub remind_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub id: Uuid,
    pub note_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub remind_at: OffsetDateTime,
    pub is_triggered: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Reminder> for ReminderResponse {
    fn from(r: Reminder) -> Self {
        Self {
            id: r.id,
            note_id: r.note_id,
            remind_at: r.remind_at,
            is_triggered: r.is_triggered,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_request_parses_rfc3339() {
        let req: ReminderRequest =
            serde_json::from_str(r#"{"remindAt":"2026-09-01T09:00:00Z"}"#).unwrap();
        assert_eq!(req.remind_at.year(), 2026);
    }
}
