//! Summarization gateway: turns a patient's notes into an LLM prose summary
//! or a synthetic trend chart.
//!
//! The completion service is reached through the `LlmClient` trait, injected
//! into `SummarizationGateway` at construction.

pub mod client;
pub mod gateway;
pub mod parser;
pub mod prompt;
pub mod types;

pub use client::*;
pub use gateway::*;
pub use parser::*;
pub use types::*;

use thiserror::Error;

use crate::db::DatabaseError;

/// Failures of a single completion call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("Completion service is not configured (missing API key)")]
    NotConfigured,

    #[error("Completion service is not reachable at {0}")]
    Connection(String),

    #[error("Completion request timed out")]
    Timeout,

    #[error("Completion service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Completion response contained no message")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("No notes found for patient {0} to analyze")]
    NoNotes(i64),

    #[error("AI service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("AI service error: {0}")]
    Upstream(String),

    #[error("AI response was not valid JSON: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<LlmError> for GatewayError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::NotConfigured
            | LlmError::Connection(_)
            | LlmError::Timeout
            | LlmError::Status { .. } => GatewayError::ServiceUnavailable(err.to_string()),
            LlmError::HttpClient(_) | LlmError::ResponseParsing(_) | LlmError::EmptyResponse => {
                GatewayError::Upstream(err.to_string())
            }
        }
    }
}
