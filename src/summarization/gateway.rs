use std::sync::Arc;

use rusqlite::Connection;

use super::parser::parse_trend_payload;
use super::prompt;
use super::types::{CompletionRequest, LlmClient, SummaryResult, TrendResult, DEFAULT_TEMPERATURE};
use super::GatewayError;
use crate::db;

/// Reads a patient's notes and asks the completion service about them.
///
/// Each operation makes at most one completion call and never writes to the
/// database. A gateway built without a client reports every call that would
/// need one as `ServiceUnavailable`.
#[derive(Clone)]
pub struct SummarizationGateway {
    client: Option<Arc<dyn LlmClient>>,
}

impl SummarizationGateway {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Gateway with no completion service configured.
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&dyn LlmClient, GatewayError> {
        self.client.as_deref().ok_or_else(|| {
            GatewayError::ServiceUnavailable(
                "AI API key is not configured on the server".into(),
            )
        })
    }

    /// Bullet-point clinical summary of all the patient's notes.
    ///
    /// A patient without notes gets `SummaryResult::NoNotes` and the service
    /// is not contacted.
    pub fn summarize(&self, conn: &Connection, patient_id: i64) -> Result<SummaryResult, GatewayError> {
        let notes = db::list_notes_for_patient(conn, patient_id)?;
        if notes.is_empty() {
            tracing::debug!(patient_id, "No notes to summarize");
            return Ok(SummaryResult::NoNotes);
        }

        let client = self.client()?;
        let request = CompletionRequest {
            system: prompt::SUMMARY_SYSTEM_PROMPT.to_string(),
            user: prompt::build_summary_prompt(&notes),
            temperature: DEFAULT_TEMPERATURE,
        };

        let text = client.complete(&request).map_err(|e| {
            tracing::warn!(patient_id, error = %e, "Summary request failed");
            GatewayError::from(e)
        })?;

        tracing::info!(patient_id, notes = notes.len(), "Summary generated");
        Ok(SummaryResult::Generated(text.trim().to_string()))
    }

    /// Synthetic health-score trend derived from the patient's notes.
    ///
    /// Unlike `summarize`, a patient without notes is a client error
    /// (`NoNotes`) since there is nothing to analyze.
    pub fn predictive_analysis(
        &self,
        conn: &Connection,
        patient_id: i64,
    ) -> Result<TrendResult, GatewayError> {
        let notes = db::list_notes_for_patient(conn, patient_id)?;
        if notes.is_empty() {
            return Err(GatewayError::NoNotes(patient_id));
        }

        let client = self.client()?;
        let request = CompletionRequest {
            system: prompt::TREND_SYSTEM_PROMPT.to_string(),
            user: prompt::build_trend_prompt(&notes),
            temperature: DEFAULT_TEMPERATURE,
        };

        let text = client.complete(&request).map_err(|e| {
            tracing::warn!(patient_id, error = %e, "Trend request failed");
            GatewayError::from(e)
        })?;

        let trend = parse_trend_payload(&text).map_err(|e| {
            tracing::warn!(patient_id, error = %e, "Trend response was not structured JSON");
            e
        })?;

        tracing::info!(patient_id, notes = notes.len(), "Trend analysis generated");
        Ok(trend)
    }
}
