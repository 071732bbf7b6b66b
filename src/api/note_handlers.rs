//! API handlers for notes and links
//!
//! Every route is scoped by the `user_id` path segment. A note or link
//! owned by another user answers 404.

use super::extract::{Json, Path};
use super::handlers::{ApiState, AppError};
use crate::notes::{CreateLinkRequest, CreateNoteRequest, Link, Note, UpdateNoteRequest};
use axum::{extract::State, http::StatusCode};

// ============================================================================
// Notes
// ============================================================================

/// List a user's notes
pub async fn list_notes(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Note>>, AppError> {
    let notes = state.note_manager.list_notes(user_id).await?;
    Ok(Json(notes))
}

/// Create a new note
pub async fn create_note(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
    Json(body): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let note = state.note_manager.create_note(user_id, body).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Get a note by ID
pub async fn get_note(
    State(state): State<ApiState>,
    Path((user_id, note_id)): Path<(i64, i64)>,
) -> Result<Json<Note>, AppError> {
    let note = state
        .note_manager
        .get_note(user_id, note_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note {} not found", note_id)))?;

    Ok(Json(note))
}

/// Update a note
pub async fn update_note(
    State(state): State<ApiState>,
    Path((user_id, note_id)): Path<(i64, i64)>,
    Json(body): Json<UpdateNoteRequest>,
) -> Result<Json<Note>, AppError> {
    let note = state
        .note_manager
        .update_note(user_id, note_id, body)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note {} not found", note_id)))?;

    Ok(Json(note))
}

/// Delete a note and its links
pub async fn delete_note(
    State(state): State<ApiState>,
    Path((user_id, note_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    let deleted = state.note_manager.delete_note(user_id, note_id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Note {} not found", note_id)))
    }
}

/// Links touching a note, in either direction
pub async fn get_note_links(
    State(state): State<ApiState>,
    Path((user_id, note_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<Link>>, AppError> {
    let links = state.note_manager.links_for_note(user_id, note_id).await?;
    Ok(Json(links))
}

// ============================================================================
// Links
// ============================================================================

/// List a user's links
pub async fn list_links(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Link>>, AppError> {
    let links = state.note_manager.list_links(user_id).await?;
    Ok(Json(links))
}

/// Link two notes
pub async fn create_link(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
    Json(body): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<Link>), AppError> {
    let link = state.note_manager.create_link(user_id, body).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// Delete a link
pub async fn delete_link(
    State(state): State<ApiState>,
    Path((user_id, link_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    let deleted = state.note_manager.delete_link(user_id, link_id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Link {} not found", link_id)))
    }
}
