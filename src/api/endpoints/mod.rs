//! HTTP handlers, one module per resource.

pub mod health;
pub mod insights;
pub mod notes;
pub mod patients;

use crate::api::error::ApiError;

/// Parse a numeric path id, rejecting anything else as a bad request.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {what} ID: {raw}")))
}
