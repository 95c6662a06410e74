//! Insurance records, one per patient.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::Insurance;
use crate::{Store, StoreResult};

fn row_to_insurance(row: &Row<'_>) -> rusqlite::Result<Insurance> {
    Ok(Insurance {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        carrier: row.get(2)?,
        member_id: row.get(3)?,
        group_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const INSURANCE_COLUMNS: &str =
    "id, patient_id, carrier, member_id, group_id, created_at, updated_at";

pub fn find_insurance_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> StoreResult<Option<Insurance>> {
    let insurance = conn
        .query_row(
            &format!("SELECT {INSURANCE_COLUMNS} FROM insurance WHERE patient_id = ?1"),
            params![patient_id],
            row_to_insurance,
        )
        .optional()?;
    Ok(insurance)
}

/// Saving again replaces the patient's existing record.
pub fn upsert_insurance(
    conn: &Connection,
    patient_id: i64,
    carrier: &str,
    member_id: &str,
    group_id: Option<&str>,
) -> StoreResult<Insurance> {
    let now = Utc::now();
    match find_insurance_for_patient(conn, patient_id)? {
        Some(existing) => {
            conn.execute(
                "UPDATE insurance SET carrier = ?1, member_id = ?2, group_id = ?3, \
                 updated_at = ?4 WHERE patient_id = ?5",
                params![carrier, member_id, group_id, now, patient_id],
            )?;
            Ok(Insurance {
                carrier: carrier.to_string(),
                member_id: member_id.to_string(),
                group_id: group_id.map(str::to_string),
                updated_at: now,
                ..existing
            })
        }
        None => {
            conn.execute(
                "INSERT INTO insurance (patient_id, carrier, member_id, group_id, created_at, \
                 updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![patient_id, carrier, member_id, group_id, now, now],
            )?;
            Ok(Insurance {
                id: conn.last_insert_rowid(),
                patient_id,
                carrier: carrier.to_string(),
                member_id: member_id.to_string(),
                group_id: group_id.map(str::to_string),
                created_at: now,
                updated_at: now,
            })
        }
    }
}

impl Store {
    pub fn find_insurance_for_patient(&self, patient_id: i64) -> StoreResult<Option<Insurance>> {
        find_insurance_for_patient(&self.lock(), patient_id)
    }

    pub fn upsert_insurance(
        &self,
        patient_id: i64,
        carrier: &str,
        member_id: &str,
        group_id: Option<&str>,
    ) -> StoreResult<Insurance> {
        upsert_insurance(&self.lock(), patient_id, carrier, member_id, group_id)
    }
}
