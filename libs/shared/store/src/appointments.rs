//! Appointment records.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{Appointment, AppointmentStatus, NewAppointment};
use crate::{is_constraint_violation, Store, StoreError, StoreResult};

fn row_to_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        appointment_date: row.get(3)?,
        appointment_time: row.get(4)?,
        duration_minutes: row.get(5)?,
        status: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

const APPOINTMENT_COLUMNS: &str = "id, patient_id, doctor_id, appointment_date, \
     appointment_time, duration_minutes, status, notes, created_at, updated_at";

pub fn insert_appointment(conn: &Connection, new: &NewAppointment) -> StoreResult<Appointment> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO appointments (patient_id, doctor_id, appointment_date, appointment_time, \
         duration_minutes, status, notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            new.patient_id,
            new.doctor_id,
            new.appointment_date,
            new.appointment_time,
            new.duration_minutes,
            AppointmentStatus::Scheduled,
            new.notes,
            now,
            now
        ],
    )
    .map_err(|err| {
        if is_constraint_violation(&err) {
            StoreError::Constraint(format!(
                "slot {} {} already booked for doctor {}",
                new.appointment_date, new.appointment_time, new.doctor_id
            ))
        } else {
            err.into()
        }
    })?;
    Ok(Appointment {
        id: conn.last_insert_rowid(),
        patient_id: new.patient_id,
        doctor_id: new.doctor_id,
        appointment_date: new.appointment_date,
        appointment_time: new.appointment_time,
        duration_minutes: new.duration_minutes,
        status: AppointmentStatus::Scheduled,
        notes: new.notes.clone(),
        created_at: now,
        updated_at: now,
    })
}

pub fn find_appointment(conn: &Connection, id: i64) -> StoreResult<Option<Appointment>> {
    let appointment = conn
        .query_row(
            &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
            params![id],
            row_to_appointment,
        )
        .optional()?;
    Ok(appointment)
}

/// Non-cancelled appointments for one doctor on one date.
pub fn booked_on(
    conn: &Connection,
    doctor_id: i64,
    date: NaiveDate,
) -> StoreResult<Vec<Appointment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
         WHERE doctor_id = ?1 AND appointment_date = ?2 AND status != ?3 \
         ORDER BY appointment_time"
    ))?;
    let appointments = stmt
        .query_map(
            params![doctor_id, date, AppointmentStatus::Cancelled],
            row_to_appointment,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(appointments)
}

/// Total appointments ever recorded for a patient, any status.
pub fn count_for_patient(conn: &Connection, patient_id: i64) -> StoreResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM appointments WHERE patient_id = ?1",
        params![patient_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn set_appointment_status(
    conn: &Connection,
    id: i64,
    status: AppointmentStatus,
    notes: Option<&str>,
) -> StoreResult<bool> {
    let now = Utc::now();
    let changed = match notes {
        Some(notes) => conn.execute(
            "UPDATE appointments SET status = ?1, notes = ?2, updated_at = ?3 WHERE id = ?4",
            params![status, notes, now, id],
        )?,
        None => conn.execute(
            "UPDATE appointments SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status, now, id],
        )?,
    };
    Ok(changed > 0)
}

impl Store {
    pub fn find_appointment(&self, id: i64) -> StoreResult<Option<Appointment>> {
        find_appointment(&self.lock(), id)
    }

    pub fn booked_on(&self, doctor_id: i64, date: NaiveDate) -> StoreResult<Vec<Appointment>> {
        booked_on(&self.lock(), doctor_id, date)
    }

    pub fn set_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
        notes: Option<&str>,
    ) -> StoreResult<bool> {
        set_appointment_status(&self.lock(), id, status, notes)
    }
}
