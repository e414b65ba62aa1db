//! Patient endpoints.
//!
//! - `GET /api/patients`: every patient with notes
//! - `POST /api/patients`: create
//! - `GET /api/patients/:id`: one patient with notes
//! - `DELETE /api/patients/:id`: delete patient and all notes

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::parse_id;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, MessageResponse};
use crate::db;
use crate::models::Patient;
use crate::validation;

/// `GET /api/patients`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Patient>>, ApiError> {
    let conn = ctx.core.open_db()?;
    let patients = db::get_all_patients(&conn)?;
    Ok(Json(patients))
}

/// `POST /api/patients`
pub async fn create(
    State(ctx): State<ApiContext>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let Json(body) = body?;
    let input = validation::validate_patient_create(&body)?;

    let conn = ctx.core.open_db()?;
    let patient = db::create_patient(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `GET /api/patients/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let conn = ctx.core.open_db()?;
    let patient = db::get_patient(&conn, patient_id)?;
    Ok(Json(patient))
}

/// `DELETE /api/patients/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let conn = ctx.core.open_db()?;
    db::delete_patient(&conn, patient_id)?;
    Ok(Json(MessageResponse {
        message: format!("Patient with ID {patient_id} and all notes deleted successfully."),
    }))
}
