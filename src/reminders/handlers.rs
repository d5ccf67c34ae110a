use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::principal::AuthUser,
    error::AppError,
    notes::repo::Note,
    reminders::dto::{ReminderRequest, ReminderResponse},
    reminders::repo::Reminder,
    state::AppState,
};

pub fn reminder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notes/:id/reminders",
            get(list_note_reminders).post(create_reminder),
        )
        .route("/reminders", get(list_upcoming_reminders))
        .route("/reminders/:id", delete(delete_reminder))
}

// Reminders are reached through the owning note, so ownership is checked on
// the note before touching the reminder table.
async fn owned_note(state: &AppState, user_id: Uuid, note_id: Uuid) -> Result<Note, AppError> {
    Note::find_by_id(&state.db, user_id, note_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note not found with id: {note_id}")))
}

#[instrument(skip(state, payload))]
pub async fn create_reminder(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(note_id): Path<Uuid>,
    Json(payload): Json<ReminderRequest>,
) -> Result<(StatusCode, Json<ReminderResponse>), AppError> {
    let note = owned_note(&state, principal.user_id, note_id).await?;
    let reminder = Reminder::create(&state.db, note.id, payload.remind_at).await?;
    info!(reminder_id = %reminder.id, note_id = %note.id, "reminder scheduled");
    Ok((StatusCode::CREATED, Json(reminder.into())))
}

#[instrument(skip(state))]
pub async fn list_note_reminders(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(note_id): Path<Uuid>,
) -> Result<Json<Vec<ReminderResponse>>, AppError> {
    let note = owned_note(&state, principal.user_id, note_id).await?;
    let reminders = Reminder::list_by_note(&state.db, note.id).await?;
    Ok(Json(reminders.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn list_upcoming_reminders(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<ReminderResponse>>, AppError> {
    let reminders = Reminder::list_upcoming_by_user(&state.db, principal.user_id).await?;
    Ok(Json(reminders.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn delete_reminder(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = Reminder::delete_for_user(&state.db, principal.user_id, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Reminder not found with id: {id}")));
    }
    info!(reminder_id = %id, user_id = %principal.user_id, "reminder deleted");
    Ok(StatusCode::NO_CONTENT)
}
