use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Storage format of `notes.timestamp`.
pub const NOTE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A free-text clinical note owned by a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub patient_id: i64,
    pub content: String,
    pub timestamp: NaiveDateTime,
}
