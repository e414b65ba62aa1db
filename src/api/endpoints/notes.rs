//! Clinical note endpoints, always scoped to a patient.
//!
//! - `GET /api/patients/:id/notes`
//! - `POST /api/patients/:id/notes`
//! - `DELETE /api/patients/:id/notes/:note_id`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::parse_id;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, MessageResponse};
use crate::db;
use crate::models::Note;
use crate::validation;

/// `GET /api/patients/:id/notes`
pub async fn list(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let conn = ctx.core.open_db()?;
    let notes = db::list_notes_for_patient(&conn, patient_id)?;
    Ok(Json(notes))
}

/// `POST /api/patients/:id/notes`
pub async fn create(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let Json(body) = body?;
    let input = validation::validate_note_create(&body)?;

    let conn = ctx.core.open_db()?;
    let note = db::add_note(&conn, patient_id, &input)?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// `DELETE /api/patients/:id/notes/:note_id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path((patient_id, note_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let note_id = parse_id(&note_id, "note")?;
    let conn = ctx.core.open_db()?;
    db::delete_note(&conn, patient_id, note_id)?;
    Ok(Json(MessageResponse {
        message: format!("Note with ID {note_id} deleted successfully."),
    }))
}
