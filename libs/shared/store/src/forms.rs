//! Intake form records.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::models::{Form, FormStatus};
use crate::{Store, StoreResult};

fn row_to_form(row: &Row<'_>) -> rusqlite::Result<Form> {
    Ok(Form {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        form_type: row.get(2)?,
        status: row.get(3)?,
        sent_at: row.get(4)?,
        completed_at: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const FORM_COLUMNS: &str =
    "id, patient_id, form_type, status, sent_at, completed_at, created_at, updated_at";

pub fn insert_form(conn: &Connection, patient_id: i64, form_type: &str) -> StoreResult<Form> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO forms (patient_id, form_type, status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![patient_id, form_type, FormStatus::Pending, now, now],
    )?;
    Ok(Form {
        id: conn.last_insert_rowid(),
        patient_id,
        form_type: form_type.to_string(),
        status: FormStatus::Pending,
        sent_at: None,
        completed_at: None,
        created_at: now,
        updated_at: now,
    })
}

pub fn mark_form_sent(conn: &Connection, id: i64, sent_at: DateTime<Utc>) -> StoreResult<bool> {
    let changed = conn.execute(
        "UPDATE forms SET status = ?1, sent_at = ?2, updated_at = ?3 WHERE id = ?4",
        params![FormStatus::Sent, sent_at, Utc::now(), id],
    )?;
    Ok(changed > 0)
}

pub fn list_forms_for_patient(conn: &Connection, patient_id: i64) -> StoreResult<Vec<Form>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FORM_COLUMNS} FROM forms WHERE patient_id = ?1 ORDER BY id"
    ))?;
    let forms = stmt
        .query_map(params![patient_id], row_to_form)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(forms)
}

impl Store {
    pub fn insert_form(&self, patient_id: i64, form_type: &str) -> StoreResult<Form> {
        insert_form(&self.lock(), patient_id, form_type)
    }

    pub fn mark_form_sent(&self, id: i64, sent_at: DateTime<Utc>) -> StoreResult<bool> {
        mark_form_sent(&self.lock(), id, sent_at)
    }

    pub fn list_forms_for_patient(&self, patient_id: i64) -> StoreResult<Vec<Form>> {
        list_forms_for_patient(&self.lock(), patient_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPatient;
    use chrono::NaiveDate;

    #[test]
    fn forms_start_pending_and_can_be_marked_sent() {
        let store = Store::open_in_memory().unwrap();
        let patient = store
            .insert_patient(&NewPatient {
                first_name: "Noor".into(),
                last_name: "Khan".into(),
                date_of_birth: NaiveDate::from_ymd_opt(2001, 12, 5).unwrap(),
                email: None,
                phone: None,
                address: None,
            })
            .unwrap();

        let form = store.insert_form(patient.id, "medical_history").unwrap();
        assert_eq!(form.status, FormStatus::Pending);
        assert!(form.sent_at.is_none());

        let sent_at = Utc::now();
        assert!(store.mark_form_sent(form.id, sent_at).unwrap());
        let forms = store.list_forms_for_patient(patient.id).unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].status, FormStatus::Sent);
        assert!(forms[0].sent_at.is_some());
    }
}
