//! AI endpoints backed by the summarization gateway.
//!
//! The completion call blocks, so each request runs on the blocking pool with
//! its own connection.

use axum::extract::{Path, State};
use axum::Json;

use super::parse_id;
use crate::api::error::ApiError;
use crate::api::types::{AnalysisResponse, ApiContext, SummaryResponse};

/// `GET /api/patients/:id/summary`
pub async fn summary(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let core = ctx.core.clone();

    let result = tokio::task::spawn_blocking(move || -> Result<String, ApiError> {
        let conn = core.open_db()?;
        let summary = core.gateway.summarize(&conn, patient_id)?;
        Ok(summary.text().to_string())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Summary task failed: {e}")))??;

    Ok(Json(SummaryResponse { summary: result }))
}

/// `GET /api/patients/:id/predictive-analysis`
pub async fn predictive_analysis(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let core = ctx.core.clone();

    let analysis = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let conn = core.open_db()?;
        Ok(core.gateway.predictive_analysis(&conn, patient_id)?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Analysis task failed: {e}")))??;

    Ok(Json(AnalysisResponse { analysis }))
}
