use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use shared_store::models::AppointmentStatus;
use shared_store::StoreError;
use thiserror::Error;

/// First visit gets a double slot.
pub const NEW_PATIENT_DURATION_MINUTES: i64 = 60;
pub const RETURNING_PATIENT_DURATION_MINUTES: i64 = 30;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Appointment not found: {0}")]
    NotFound(i64),

    #[error("Patient not found: {0}")]
    PatientNotFound(i64),

    #[error("Doctor not found: {0}")]
    DoctorNotFound(i64),

    #[error("Slot {time} on {date} is not available")]
    SlotUnavailable { date: NaiveDate, time: NaiveTime },

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<StoreError> for ScheduleError {
    fn from(err: StoreError) -> Self {
        ScheduleError::Database(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDate,
    /// "HH:MM" (seconds accepted and ignored).
    pub appointment_time: String,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}

pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ScheduleError::InvalidTime(raw.to_string()))
}
