//! Doctor directory.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{Doctor, NewDoctor};
use crate::{Store, StoreResult};

fn row_to_doctor(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        specialty: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const DOCTOR_COLUMNS: &str =
    "id, first_name, last_name, specialty, email, phone, created_at, updated_at";

pub fn insert_doctor(conn: &Connection, new: &NewDoctor) -> StoreResult<Doctor> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO doctors (first_name, last_name, specialty, email, phone, created_at, \
         updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            new.first_name,
            new.last_name,
            new.specialty,
            new.email,
            new.phone,
            now,
            now
        ],
    )?;
    Ok(Doctor {
        id: conn.last_insert_rowid(),
        first_name: new.first_name.clone(),
        last_name: new.last_name.clone(),
        specialty: new.specialty.clone(),
        email: new.email.clone(),
        phone: new.phone.clone(),
        created_at: now,
        updated_at: now,
    })
}

pub fn find_doctor(conn: &Connection, id: i64) -> StoreResult<Option<Doctor>> {
    let doctor = conn
        .query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"),
            params![id],
            row_to_doctor,
        )
        .optional()?;
    Ok(doctor)
}

pub fn list_doctors(conn: &Connection) -> StoreResult<Vec<Doctor>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY last_name, first_name"
    ))?;
    let doctors = stmt
        .query_map([], row_to_doctor)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(doctors)
}

pub fn count_doctors(conn: &Connection) -> StoreResult<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?;
    Ok(count)
}

impl Store {
    pub fn insert_doctor(&self, new: &NewDoctor) -> StoreResult<Doctor> {
        insert_doctor(&self.lock(), new)
    }

    pub fn find_doctor(&self, id: i64) -> StoreResult<Option<Doctor>> {
        find_doctor(&self.lock(), id)
    }

    pub fn list_doctors(&self) -> StoreResult<Vec<Doctor>> {
        list_doctors(&self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_orders_by_name() {
        let store = Store::open_in_memory().unwrap();
        for (first, last) in [("Ana", "Weber"), ("Ben", "Adler")] {
            store
                .insert_doctor(&NewDoctor {
                    first_name: first.into(),
                    last_name: last.into(),
                    specialty: "family_medicine".into(),
                    email: None,
                    phone: None,
                })
                .unwrap();
        }
        let doctors = store.list_doctors().unwrap();
        assert_eq!(doctors.len(), 2);
        assert_eq!(doctors[0].last_name, "Adler");
        assert_eq!(doctors[1].full_name(), "Dr. Ana Weber");
    }

    #[test]
    fn find_missing_doctor_is_none() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.find_doctor(99).unwrap().is_none());
    }
}
