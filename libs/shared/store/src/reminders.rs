//! Reminder records and the due-reminder query.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::models::{Reminder, ReminderStatus};
use crate::{Store, StoreResult};

fn row_to_reminder(row: &Row<'_>) -> rusqlite::Result<Reminder> {
    Ok(Reminder {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        reminder_type: row.get(2)?,
        scheduled_time: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const REMINDER_COLUMNS: &str =
    "id, appointment_id, reminder_type, scheduled_time, status, created_at, updated_at";

/// A pending reminder joined with everything dispatch needs.
#[derive(Debug, Clone)]
pub struct DueReminder {
    pub reminder: Reminder,
    pub patient_name: String,
    pub patient_email: Option<String>,
    pub patient_phone: Option<String>,
    pub doctor_name: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
}

pub fn insert_reminder(
    conn: &Connection,
    appointment_id: i64,
    reminder_type: &str,
    scheduled_time: DateTime<Utc>,
) -> StoreResult<Reminder> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO reminders (appointment_id, reminder_type, scheduled_time, status, \
         created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            appointment_id,
            reminder_type,
            scheduled_time,
            ReminderStatus::Pending,
            now,
            now
        ],
    )?;
    Ok(Reminder {
        id: conn.last_insert_rowid(),
        appointment_id,
        reminder_type: reminder_type.to_string(),
        scheduled_time,
        status: ReminderStatus::Pending,
        created_at: now,
        updated_at: now,
    })
}

pub fn list_reminders_for_appointment(
    conn: &Connection,
    appointment_id: i64,
) -> StoreResult<Vec<Reminder>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REMINDER_COLUMNS} FROM reminders WHERE appointment_id = ?1 \
         ORDER BY scheduled_time"
    ))?;
    let reminders = stmt
        .query_map(params![appointment_id], row_to_reminder)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(reminders)
}

/// Pending reminders due at `now`, excluding cancelled appointments.
pub fn due_reminders(conn: &Connection, now: DateTime<Utc>) -> StoreResult<Vec<DueReminder>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.appointment_id, r.reminder_type, r.scheduled_time, r.status, \
                r.created_at, r.updated_at, \
                p.first_name, p.last_name, p.email, p.phone, \
                d.first_name, d.last_name, \
                a.appointment_date, a.appointment_time \
         FROM reminders r \
         JOIN appointments a ON a.id = r.appointment_id \
         JOIN patients p ON p.id = a.patient_id \
         JOIN doctors d ON d.id = a.doctor_id \
         WHERE r.status = 'pending' AND r.scheduled_time <= ?1 AND a.status != 'cancelled' \
         ORDER BY r.scheduled_time",
    )?;
    let due = stmt
        .query_map(params![now], |row| {
            let reminder = row_to_reminder(row)?;
            let patient_first: String = row.get(7)?;
            let patient_last: String = row.get(8)?;
            let doctor_first: String = row.get(11)?;
            let doctor_last: String = row.get(12)?;
            Ok(DueReminder {
                reminder,
                patient_name: format!("{} {}", patient_first, patient_last),
                patient_email: row.get(9)?,
                patient_phone: row.get(10)?,
                doctor_name: format!("Dr. {} {}", doctor_first, doctor_last),
                appointment_date: row.get(13)?,
                appointment_time: row.get(14)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(due)
}

pub fn set_reminder_status(
    conn: &Connection,
    id: i64,
    status: ReminderStatus,
) -> StoreResult<bool> {
    let changed = conn.execute(
        "UPDATE reminders SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status, Utc::now(), id],
    )?;
    Ok(changed > 0)
}

impl Store {
    pub fn list_reminders_for_appointment(&self, appointment_id: i64) -> StoreResult<Vec<Reminder>> {
        list_reminders_for_appointment(&self.lock(), appointment_id)
    }

    pub fn due_reminders(&self, now: DateTime<Utc>) -> StoreResult<Vec<DueReminder>> {
        due_reminders(&self.lock(), now)
    }

    pub fn set_reminder_status(&self, id: i64, status: ReminderStatus) -> StoreResult<bool> {
        set_reminder_status(&self.lock(), id, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, NewAppointment, NewDoctor, NewPatient};
    use chrono::TimeZone;

    fn seed_appointment(store: &Store) -> i64 {
        let patient = store
            .insert_patient(&NewPatient {
                first_name: "Lena".into(),
                last_name: "Moss".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1992, 6, 11).unwrap(),
                email: Some("lena@example.com".into()),
                phone: None,
                address: None,
            })
            .unwrap();
        let doctor = store
            .insert_doctor(&NewDoctor {
                first_name: "Omar".into(),
                last_name: "Reyes".into(),
                specialty: "dermatology".into(),
                email: None,
                phone: None,
            })
            .unwrap();
        store
            .with_conn(|conn| {
                crate::appointments::insert_appointment(
                    conn,
                    &NewAppointment {
                        patient_id: patient.id,
                        doctor_id: doctor.id,
                        appointment_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
                        appointment_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                        duration_minutes: 30,
                        notes: None,
                    },
                )
            })
            .unwrap()
            .id
    }

    #[test]
    fn due_query_skips_future_and_cancelled() {
        let store = Store::open_in_memory().unwrap();
        let appointment_id = seed_appointment(&store);

        let past = Utc.with_ymd_and_hms(2025, 3, 13, 9, 0, 0).unwrap();
        let future = Utc.with_ymd_and_hms(2025, 3, 19, 9, 0, 0).unwrap();
        store
            .with_conn(|conn| insert_reminder(conn, appointment_id, "7-day", past))
            .unwrap();
        store
            .with_conn(|conn| insert_reminder(conn, appointment_id, "1-day", future))
            .unwrap();

        let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        let due = store.due_reminders(now).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].reminder.reminder_type, "7-day");
        assert_eq!(due[0].patient_name, "Lena Moss");
        assert_eq!(due[0].doctor_name, "Dr. Omar Reyes");

        store
            .set_appointment_status(appointment_id, AppointmentStatus::Cancelled, None)
            .unwrap();
        assert!(store.due_reminders(now).unwrap().is_empty());
    }

    #[test]
    fn sent_reminders_are_not_picked_up_again() {
        let store = Store::open_in_memory().unwrap();
        let appointment_id = seed_appointment(&store);
        let when = Utc.with_ymd_and_hms(2025, 3, 13, 9, 0, 0).unwrap();
        let reminder = store
            .with_conn(|conn| insert_reminder(conn, appointment_id, "7-day", when))
            .unwrap();

        store
            .set_reminder_status(reminder.id, ReminderStatus::Sent)
            .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap();
        assert!(store.due_reminders(now).unwrap().is_empty());
    }
}
