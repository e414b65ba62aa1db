//! Request validation for patient and note creation.
//!
//! Bodies are inspected as untyped JSON so a missing field and a field of the
//! wrong type are rejected the same way, before anything reaches storage.
//! Accepted values come back trimmed.

use serde_json::{Map, Value};
use thiserror::Error;

/// Client supplied a malformed or incomplete request body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Normalized input for `create_patient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub name: String,
    pub dob: String,
    pub gender: Option<String>,
    pub blood_type: Option<String>,
    pub contact_number: Option<String>,
}

/// Normalized input for `add_note`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub content: String,
}

/// Validate a patient creation body.
///
/// `name` and `dob` are required non-blank strings. `gender`, `blood_type`
/// and `contact_number` may be omitted or null; when present they must be
/// strings, and a blank value is treated as absent.
pub fn validate_patient_create(input: &Value) -> Result<NewPatient, ValidationError> {
    let body = as_object(input)?;

    Ok(NewPatient {
        name: required_string(body, "name")?,
        dob: required_string(body, "dob")?,
        gender: optional_string(body, "gender")?,
        blood_type: optional_string(body, "blood_type")?,
        contact_number: optional_string(body, "contact_number")?,
    })
}

/// Validate a note creation body: `content` must be a non-blank string.
pub fn validate_note_create(input: &Value) -> Result<NewNote, ValidationError> {
    let body = as_object(input)?;
    Ok(NewNote {
        content: required_string(body, "content")?,
    })
}

fn as_object(input: &Value) -> Result<&Map<String, Value>, ValidationError> {
    input
        .as_object()
        .ok_or_else(|| ValidationError::new("Request body must be a JSON object"))
}

fn required_string(body: &Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    match body.get(field) {
        None | Some(Value::Null) => Err(ValidationError::new(format!(
            "Missing required field: {field}"
        ))),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(ValidationError::new(format!(
                    "{field} must be a non-empty string"
                )))
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(_) => Err(ValidationError::new(format!("{field} must be a string"))),
    }
}

fn optional_string(
    body: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, ValidationError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(_) => Err(ValidationError::new(format!("{field} must be a string"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_patient_and_trims() {
        let patient =
            validate_patient_create(&json!({"name": "  Jane Doe ", "dob": "1990-01-01\n"}))
                .unwrap();
        assert_eq!(patient.name, "Jane Doe");
        assert_eq!(patient.dob, "1990-01-01");
        assert_eq!(patient.gender, None);
        assert_eq!(patient.blood_type, None);
        assert_eq!(patient.contact_number, None);
    }

    #[test]
    fn accepts_optional_fields() {
        let patient = validate_patient_create(&json!({
            "name": "John",
            "dob": "1970-05-05",
            "gender": " male ",
            "blood_type": "O+",
            "contact_number": null,
        }))
        .unwrap();
        assert_eq!(patient.gender.as_deref(), Some("male"));
        assert_eq!(patient.blood_type.as_deref(), Some("O+"));
        assert_eq!(patient.contact_number, None);
    }

    #[test]
    fn blank_optional_field_becomes_absent() {
        let patient =
            validate_patient_create(&json!({"name": "A", "dob": "B", "gender": "   "})).unwrap();
        assert_eq!(patient.gender, None);
    }

    #[test]
    fn rejects_empty_or_whitespace_name() {
        assert!(validate_patient_create(&json!({"name": "", "dob": "1990-01-01"})).is_err());
        assert!(validate_patient_create(&json!({"name": " \t ", "dob": "1990-01-01"})).is_err());
    }

    #[test]
    fn rejects_missing_required_fields() {
        assert!(validate_patient_create(&json!({"dob": "1990-01-01"})).is_err());
        assert!(validate_patient_create(&json!({"name": "Jane"})).is_err());
        assert!(validate_patient_create(&json!({"name": "Jane", "dob": null})).is_err());
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(validate_patient_create(&json!({"name": 42, "dob": "1990-01-01"})).is_err());
        assert!(validate_patient_create(&json!({"name": "Jane", "dob": ["1990"]})).is_err());
        assert!(validate_patient_create(&json!({
            "name": "Jane", "dob": "1990-01-01", "blood_type": 7
        }))
        .is_err());
    }

    #[test]
    fn rejects_non_object_body() {
        assert!(validate_patient_create(&json!(null)).is_err());
        assert!(validate_patient_create(&json!(["Jane", "1990"])).is_err());
        assert!(validate_note_create(&json!("BP 120/80")).is_err());
    }

    #[test]
    fn note_content_is_trimmed() {
        let note = validate_note_create(&json!({"content": "  BP 120/80  "})).unwrap();
        assert_eq!(note.content, "BP 120/80");
    }

    #[test]
    fn note_rejects_blank_missing_or_wrong_type() {
        assert!(validate_note_create(&json!({"content": "   "})).is_err());
        assert!(validate_note_create(&json!({})).is_err());
        assert!(validate_note_create(&json!({"content": true})).is_err());
    }

    #[test]
    fn error_carries_message() {
        let err = validate_note_create(&json!({})).unwrap_err();
        assert!(!err.message().is_empty());
        assert_eq!(err.to_string(), err.message());
    }
}
