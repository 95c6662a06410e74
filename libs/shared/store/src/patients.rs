//! Patient records.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{NewPatient, Patient};
use crate::{Store, StoreResult};

fn row_to_patient(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        address: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const PATIENT_COLUMNS: &str =
    "id, first_name, last_name, date_of_birth, email, phone, address, created_at, updated_at";

pub fn insert_patient(conn: &Connection, new: &NewPatient) -> StoreResult<Patient> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO patients (first_name, last_name, date_of_birth, email, phone, address, \
         created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            new.first_name,
            new.last_name,
            new.date_of_birth,
            new.email,
            new.phone,
            new.address,
            now,
            now
        ],
    )?;
    Ok(Patient {
        id: conn.last_insert_rowid(),
        first_name: new.first_name.clone(),
        last_name: new.last_name.clone(),
        date_of_birth: new.date_of_birth,
        email: new.email.clone(),
        phone: new.phone.clone(),
        address: new.address.clone(),
        created_at: now,
        updated_at: now,
    })
}

pub fn find_patient(conn: &Connection, id: i64) -> StoreResult<Option<Patient>> {
    let patient = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
            params![id],
            row_to_patient,
        )
        .optional()?;
    Ok(patient)
}

/// Name match is case-insensitive; date of birth is exact.
pub fn find_patient_by_name_dob(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
    date_of_birth: NaiveDate,
) -> StoreResult<Option<Patient>> {
    let patient = conn
        .query_row(
            &format!(
                "SELECT {PATIENT_COLUMNS} FROM patients \
                 WHERE LOWER(first_name) = LOWER(?1) AND LOWER(last_name) = LOWER(?2) \
                 AND date_of_birth = ?3"
            ),
            params![first_name, last_name, date_of_birth],
            row_to_patient,
        )
        .optional()?;
    Ok(patient)
}

impl Store {
    pub fn insert_patient(&self, new: &NewPatient) -> StoreResult<Patient> {
        insert_patient(&self.lock(), new)
    }

    pub fn find_patient(&self, id: i64) -> StoreResult<Option<Patient>> {
        find_patient(&self.lock(), id)
    }

    pub fn find_patient_by_name_dob(
        &self,
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
    ) -> StoreResult<Option<Patient>> {
        find_patient_by_name_dob(&self.lock(), first_name, last_name, date_of_birth)
    }
}
