use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::notes::repo::Note;

/// Request body for creating or updating a note.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    pub title: String,
    pub content: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub image_urls: Vec<String>,
    pub user_id: Uuid,
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl NoteResponse {
    pub fn from_note(note: Note, username: &str) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            image_urls: note.image_urls.0,
            user_id: note.user_id,
            username: username.to_string(),
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub term: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_request_defaults_image_urls() {
        let req: NoteRequest =
            serde_json::from_str(r#"{"title":"groceries","content":"milk"}"#).unwrap();
        assert!(req.image_urls.is_empty());
    }

    #[test]
    fn note_response_serializes_camel_case_timestamps() {
        let now = OffsetDateTime::now_utc();
        let response = NoteResponse {
            id: Uuid::new_v4(),
            title: "groceries".into(),
            content: None,
            image_urls: vec![],
            user_id: Uuid::new_v4(),
            username: "alice".into(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"imageUrls\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"userId\""));
    }
}
