//! Flattened appointment rows for export.

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::models::AppointmentStatus;
use crate::{Store, StoreResult};

/// One appointment joined with its patient, doctor and insurance.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub appointment_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub duration_minutes: i64,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub patient_date_of_birth: NaiveDate,
    pub patient_email: Option<String>,
    pub patient_phone: Option<String>,
    pub doctor_first_name: String,
    pub doctor_last_name: String,
    pub doctor_specialty: String,
    pub insurance_carrier: Option<String>,
    pub insurance_member_id: Option<String>,
    pub insurance_group_id: Option<String>,
}

fn row_to_export(row: &Row<'_>) -> rusqlite::Result<ExportRow> {
    Ok(ExportRow {
        appointment_id: row.get(0)?,
        appointment_date: row.get(1)?,
        appointment_time: row.get(2)?,
        duration_minutes: row.get(3)?,
        status: row.get(4)?,
        notes: row.get(5)?,
        patient_first_name: row.get(6)?,
        patient_last_name: row.get(7)?,
        patient_date_of_birth: row.get(8)?,
        patient_email: row.get(9)?,
        patient_phone: row.get(10)?,
        doctor_first_name: row.get(11)?,
        doctor_last_name: row.get(12)?,
        doctor_specialty: row.get(13)?,
        insurance_carrier: row.get(14)?,
        insurance_member_id: row.get(15)?,
        insurance_group_id: row.get(16)?,
    })
}

const EXPORT_QUERY: &str = "SELECT a.id, a.appointment_date, a.appointment_time, \
        a.duration_minutes, a.status, a.notes, \
        p.first_name, p.last_name, p.date_of_birth, p.email, p.phone, \
        d.first_name, d.last_name, d.specialty, \
        i.carrier, i.member_id, i.group_id \
 FROM appointments a \
 JOIN patients p ON p.id = a.patient_id \
 JOIN doctors d ON d.id = a.doctor_id \
 LEFT JOIN insurance i ON i.patient_id = a.patient_id";

pub fn export_rows(conn: &Connection, appointment_id: Option<i64>) -> StoreResult<Vec<ExportRow>> {
    let rows = match appointment_id {
        Some(id) => {
            let mut stmt =
                conn.prepare(&format!("{EXPORT_QUERY} WHERE a.id = ?1 ORDER BY a.id"))?;
            let rows = stmt
                .query_map([id], row_to_export)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "{EXPORT_QUERY} ORDER BY a.appointment_date, a.appointment_time, a.id"
            ))?;
            let rows = stmt
                .query_map([], row_to_export)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        }
    };
    Ok(rows)
}

impl Store {
    pub fn export_rows(&self, appointment_id: Option<i64>) -> StoreResult<Vec<ExportRow>> {
        export_rows(&self.lock(), appointment_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAppointment, NewDoctor, NewPatient};
    use crate::Store;

    #[test]
    fn export_row_carries_insurance_when_present() {
        let store = Store::open_in_memory().unwrap();
        let patient = store
            .insert_patient(&NewPatient {
                first_name: "Ada".into(),
                last_name: "Quinn".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1980, 2, 29).unwrap(),
                email: Some("ada@example.com".into()),
                phone: None,
                address: None,
            })
            .unwrap();
        let doctor = store
            .insert_doctor(&NewDoctor {
                first_name: "Tess".into(),
                last_name: "Varga".into(),
                specialty: "pediatrics".into(),
                email: None,
                phone: None,
            })
            .unwrap();
        let appointment = store
            .with_conn(|conn| {
                crate::appointments::insert_appointment(
                    conn,
                    &NewAppointment {
                        patient_id: patient.id,
                        doctor_id: doctor.id,
                        appointment_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                        appointment_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
                        duration_minutes: 60,
                        notes: None,
                    },
                )
            })
            .unwrap();

        // No insurance yet: row still exports.
        let rows = store.export_rows(Some(appointment.id)).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].insurance_carrier.is_none());

        store
            .upsert_insurance(patient.id, "Cigna", "CG-9", Some("GRP-1"))
            .unwrap();
        let rows = store.export_rows(None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].insurance_carrier.as_deref(), Some("Cigna"));
        assert_eq!(rows[0].doctor_specialty, "pediatrics");
        assert_eq!(rows[0].patient_last_name, "Quinn");
    }
}
