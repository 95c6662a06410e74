//! Sample roster for a fresh database.

use tracing::info;

use crate::doctors::{count_doctors, insert_doctor};
use crate::models::NewDoctor;
use crate::{Store, StoreResult};

fn sample_roster() -> Vec<NewDoctor> {
    let roster = [
        ("Sarah", "Chen", "family_medicine"),
        ("James", "Wilson", "pediatrics"),
        ("Maria", "Garcia", "cardiology"),
        ("David", "Kim", "dermatology"),
        ("Lisa", "Patel", "orthopedics"),
    ];
    roster
        .into_iter()
        .map(|(first, last, specialty)| NewDoctor {
            first_name: first.to_string(),
            last_name: last.to_string(),
            specialty: specialty.to_string(),
            email: Some(format!(
                "{}.{}@clinic.example",
                first.to_lowercase(),
                last.to_lowercase()
            )),
            phone: None,
        })
        .collect()
}

impl Store {
    /// Insert the sample doctors when the table is empty. Returns how
    /// many were inserted.
    pub fn seed_doctors_if_empty(&self) -> StoreResult<usize> {
        let conn = self.lock();
        if count_doctors(&conn)? > 0 {
            return Ok(0);
        }
        let roster = sample_roster();
        for doctor in &roster {
            insert_doctor(&conn, doctor)?;
        }
        info!(count = roster.len(), "seeded doctor roster");
        Ok(roster.len())
    }
}
