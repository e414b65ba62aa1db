use serde::Serialize;

use super::LlmError;

/// Sampling temperature used for every gateway call.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// One chat-style completion: a system instruction plus a single user message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Chat completion client abstraction (allows mocking)
pub trait LlmClient: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Outcome of `SummarizationGateway::summarize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryResult {
    /// The patient has no notes; the service was not called.
    NoNotes,
    Generated(String),
}

impl SummaryResult {
    pub const NO_NOTES_MESSAGE: &'static str = "No notes available to generate a summary.";

    pub fn text(&self) -> &str {
        match self {
            Self::NoNotes => Self::NO_NOTES_MESSAGE,
            Self::Generated(text) => text,
        }
    }
}

/// Trend payload returned by the service, passed through as parsed JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrendResult(pub serde_json::Value);
