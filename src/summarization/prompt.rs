//! Fixed prompt templates for the two gateway calls.

use crate::models::Note;

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a helpful medical assistant.";

pub const TREND_SYSTEM_PROMPT: &str = "You are a medical AI. Analyze the patient's history and \
provide a JSON object that describes a trend over time for a hypothetical metric like \
'Patient Health Score' (1-100). The JSON must contain:\n\
- 'labels': array of dates\n\
- 'data': array of scores\n\
Use at least 5 data points. Respond ONLY with JSON.";

/// Concatenate note contents in the order given, one per line.
pub fn join_notes(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| n.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// User message asking for a bullet-point clinical summary.
pub fn build_summary_prompt(notes: &[Note]) -> String {
    format!(
        "Summarize the following clinical notes for a patient into a concise, easy-to-read \
         summary for a doctor. Focus on key diagnoses, medications, and recent changes. \
         Format it with bullet points.\n\n\
         PATIENT NOTES:\n---\n{}\n---\n\nSUMMARY:",
        join_notes(notes)
    )
}

/// User message for the trend request.
pub fn build_trend_prompt(notes: &[Note]) -> String {
    format!("Patient Notes:\n{}", join_notes(notes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn note(id: i64, content: &str) -> Note {
        Note {
            id,
            patient_id: 1,
            content: content.into(),
            timestamp: NaiveDateTime::default(),
        }
    }

    #[test]
    fn notes_joined_in_retrieval_order() {
        let notes = vec![note(2, "second"), note(1, "first")];
        assert_eq!(join_notes(&notes), "second\nfirst");
    }

    #[test]
    fn summary_prompt_embeds_notes_and_asks_for_bullets() {
        let prompt = build_summary_prompt(&[note(1, "BP 120/80"), note(2, "Started lisinopril")]);
        assert!(prompt.contains("bullet points"));
        assert!(prompt.contains("---\nBP 120/80\nStarted lisinopril\n---"));
        assert!(prompt.ends_with("SUMMARY:"));
    }

    #[test]
    fn trend_system_prompt_requires_json_only() {
        assert!(TREND_SYSTEM_PROMPT.contains("'labels'"));
        assert!(TREND_SYSTEM_PROMPT.contains("'data'"));
        assert!(TREND_SYSTEM_PROMPT.ends_with("Respond ONLY with JSON."));
        assert!(build_trend_prompt(&[note(1, "A1c 7.2")]).contains("A1c 7.2"));
    }
}
