use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::principal::AuthUser,
    error::AppError,
    notes::dto::{NoteRequest, NoteResponse, Pagination, SearchParams},
    notes::repo::Note,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes))
        .route("/notes/search", get(search_notes))
        .route("/notes/:id", get(get_note))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", post(create_note))
        .route("/notes/:id", put(update_note).delete(delete_note))
}

fn validate(payload: &NoteRequest) -> Result<(), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".into()));
    }
    if payload.title.len() > 255 {
        return Err(AppError::Validation("Title too long".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_note(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(payload): Json<NoteRequest>,
) -> Result<(StatusCode, Json<NoteResponse>), AppError> {
    validate(&payload)?;
    let note = Note::create(
        &state.db,
        principal.user_id,
        &payload.title,
        payload.content.as_deref(),
        &payload.image_urls,
    )
    .await?;
    info!(note_id = %note.id, user_id = %principal.user_id, "note created");
    Ok((
        StatusCode::CREATED,
        Json(NoteResponse::from_note(note, &principal.username)),
    ))
}

#[instrument(skip(state))]
pub async fn list_notes(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<NoteResponse>>, AppError> {
    let notes = Note::list_by_user(&state.db, principal.user_id, p.limit, p.offset).await?;
    let items = notes
        .into_iter()
        .map(|n| NoteResponse::from_note(n, &principal.username))
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_note(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = Note::find_by_id(&state.db, principal.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note not found with id: {id}")))?;
    Ok(Json(NoteResponse::from_note(note, &principal.username)))
}

#[instrument(skip(state, payload))]
pub async fn update_note(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<NoteRequest>,
) -> Result<Json<NoteResponse>, AppError> {
    validate(&payload)?;
    let note = Note::update(
        &state.db,
        principal.user_id,
        id,
        &payload.title,
        payload.content.as_deref(),
        &payload.image_urls,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Note not found with id: {id}")))?;
    info!(note_id = %note.id, user_id = %principal.user_id, "note updated");
    Ok(Json(NoteResponse::from_note(note, &principal.username)))
}

#[instrument(skip(state))]
pub async fn delete_note(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = Note::delete(&state.db, principal.user_id, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Note not found with id: {id}")));
    }
    info!(note_id = %id, user_id = %principal.user_id, "note deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn search_notes(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<NoteResponse>>, AppError> {
    let notes = Note::search_by_title(&state.db, principal.user_id, &params.term).await?;
    let items = notes
        .into_iter()
        .map(|n| NoteResponse::from_note(n, &principal.username))
        .collect();
    Ok(Json(items))
}
