use chrono::NaiveDate;
use serde::Serialize;
use shared_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<StoreError> for DoctorError {
    fn from(err: StoreError) -> Self {
        DoctorError::Database(err.to_string())
    }
}

/// Availability for one doctor on one date; slot starts are "HH:MM".
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub available_slots: Vec<String>,
}
