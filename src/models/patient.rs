use serde::{Deserialize, Serialize};

use super::note::Note;

/// A patient record with its clinical notes attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub dob: String,
    pub gender: Option<String>,
    pub blood_type: Option<String>,
    pub contact_number: Option<String>,
    pub notes: Vec<Note>,
}
