use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};

use super::note::{map_note_row, notes_for_patient, read_note_row, NOTE_COLUMNS};
use crate::db::DatabaseError;
use crate::models::*;
use crate::validation::NewPatient;

const PATIENT_COLUMNS: &str = "id, name, dob, gender, blood_type, contact_number";

type PatientRow = (i64, String, String, Option<String>, Option<String>, Option<String>);

fn read_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok((
        row.get::<_, i64>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, Option<String>>(3)?,
        row.get::<_, Option<String>>(4)?,
        row.get::<_, Option<String>>(5)?,
    ))
}

fn patient_from_row(row: PatientRow, notes: Vec<Note>) -> Patient {
    let (id, name, dob, gender, blood_type, contact_number) = row;
    Patient {
        id,
        name,
        dob,
        gender,
        blood_type,
        contact_number,
        notes,
    }
}

/// Insert a validated patient and return it with an empty notes list.
pub fn create_patient(conn: &Connection, patient: &NewPatient) -> Result<Patient, DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO patients (name, dob, gender, blood_type, contact_number)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            patient.name,
            patient.dob,
            patient.gender,
            patient.blood_type,
            patient.contact_number,
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    tracing::info!(patient_id = id, "Patient created");

    Ok(Patient {
        id,
        name: patient.name.clone(),
        dob: patient.dob.clone(),
        gender: patient.gender.clone(),
        blood_type: patient.blood_type.clone(),
        contact_number: patient.contact_number.clone(),
        notes: Vec::new(),
    })
}

/// All patients in insertion order, each with its notes attached.
///
/// Both reads share one transaction so the notes always match the patient
/// list they are attached to.
pub fn get_all_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let mut notes_by_patient: HashMap<i64, Vec<Note>> = HashMap::new();
    {
        let mut stmt = tx.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY id"))?;
        let rows = stmt.query_map([], read_note_row)?;
        for row in rows {
            let note = map_note_row(row?)?;
            notes_by_patient.entry(note.patient_id).or_default().push(note);
        }
    }

    let mut patients = Vec::new();
    {
        let mut stmt =
            tx.prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id"))?;
        let rows = stmt.query_map([], read_patient_row)?;
        for row in rows {
            let row = row?;
            let notes = notes_by_patient.remove(&row.0).unwrap_or_default();
            patients.push(patient_from_row(row, notes));
        }
    }

    tx.commit()?;
    Ok(patients)
}

/// Fetch one patient with notes, or `NotFound`.
pub fn get_patient(conn: &Connection, id: i64) -> Result<Patient, DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let row = tx
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
            params![id],
            read_patient_row,
        )
        .optional()?
        .ok_or_else(|| DatabaseError::not_found("Patient", id))?;
    let notes = notes_for_patient(&tx, id)?;

    tx.commit()?;
    Ok(patient_from_row(row, notes))
}

/// Delete a patient and all of its notes.
///
/// Notes are removed explicitly before the patient row, inside the same
/// transaction, so the outcome never depends on the engine honouring
/// `ON DELETE CASCADE`. Any failure drops the transaction uncommitted.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let notes_deleted = tx.execute("DELETE FROM notes WHERE patient_id = ?1", params![id])?;
    let deleted = tx.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Patient", id));
    }

    tx.commit()?;

    tracing::info!(
        patient_id = id,
        notes_deleted,
        "Patient cascade-deleted with all notes"
    );
    Ok(())
}

pub fn patient_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1)",
        params![id],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}
