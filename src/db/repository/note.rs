use chrono::{NaiveDateTime, Timelike, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::patient::patient_exists;
use crate::db::DatabaseError;
use crate::models::*;
use crate::validation::NewNote;

pub(super) const NOTE_COLUMNS: &str = "id, patient_id, content, timestamp";

// Internal row type for Note mapping
pub(super) struct NoteRow {
    id: i64,
    patient_id: i64,
    content: String,
    timestamp: String,
}

pub(super) fn map_note_row(row: NoteRow) -> Result<Note, DatabaseError> {
    let timestamp = NaiveDateTime::parse_from_str(&row.timestamp, NOTE_TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(&row.timestamp, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| DatabaseError::InvalidTimestamp {
            id: row.id,
            value: row.timestamp.clone(),
        })?;

    Ok(Note {
        id: row.id,
        patient_id: row.patient_id,
        content: row.content,
        timestamp,
    })
}

pub(super) fn read_note_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NoteRow> {
    Ok(NoteRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        content: row.get(2)?,
        timestamp: row.get(3)?,
    })
}

/// Notes for a patient in insertion order, without checking the patient exists.
pub(super) fn notes_for_patient(conn: &Connection, patient_id: i64) -> Result<Vec<Note>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {NOTE_COLUMNS} FROM notes WHERE patient_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![patient_id], read_note_row)?;

    let mut notes = Vec::new();
    for row in rows {
        notes.push(map_note_row(row?)?);
    }
    Ok(notes)
}

/// Add a note under an existing patient. The timestamp is assigned here (UTC,
/// second precision) and never changes afterwards.
pub fn add_note(conn: &Connection, patient_id: i64, note: &NewNote) -> Result<Note, DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    if !patient_exists(&tx, patient_id)? {
        return Err(DatabaseError::not_found("Patient", patient_id));
    }

    let now = Utc::now().naive_utc();
    let timestamp = now.with_nanosecond(0).unwrap_or(now);
    tx.execute(
        "INSERT INTO notes (patient_id, content, timestamp) VALUES (?1, ?2, ?3)",
        params![
            patient_id,
            note.content,
            timestamp.format(NOTE_TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    tracing::info!(patient_id, note_id = id, "Note added");

    Ok(Note {
        id,
        patient_id,
        content: note.content.clone(),
        timestamp,
    })
}

/// Delete a note only if it belongs to `patient_id`.
///
/// A note id owned by a different patient is reported as `NotFound` and left
/// untouched.
pub fn delete_note(conn: &Connection, patient_id: i64, note_id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM notes WHERE id = ?1 AND patient_id = ?2",
        params![note_id, patient_id],
    )?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Note", note_id));
    }

    tracing::info!(patient_id, note_id, "Note deleted");
    Ok(())
}

/// All notes of an existing patient; empty when it has none.
pub fn list_notes_for_patient(conn: &Connection, patient_id: i64) -> Result<Vec<Note>, DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    if !patient_exists(&tx, patient_id)? {
        return Err(DatabaseError::not_found("Patient", patient_id));
    }
    let notes = notes_for_patient(&tx, patient_id)?;
    tx.commit()?;
    Ok(notes)
}

/// Scoped lookup of a single note.
pub fn get_note(
    conn: &Connection,
    patient_id: i64,
    note_id: i64,
) -> Result<Option<Note>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1 AND patient_id = ?2"),
            params![note_id, patient_id],
            read_note_row,
        )
        .optional()?;
    row.map(map_note_row).transpose()
}

pub fn count_notes(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
    Ok(count)
}
