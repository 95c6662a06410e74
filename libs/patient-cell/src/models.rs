use chrono::NaiveDate;
use serde::Deserialize;
use shared_store::StoreError;
use thiserror::Error;

/// Intake forms sent to every new patient.
pub const INTAKE_FORM_TYPES: [&str; 3] = [
    "patient_information",
    "medical_history",
    "insurance_verification",
];

#[derive(Error, Debug)]
pub enum PatientError {
    #[error("Patient not found: {0}")]
    NotFound(i64),

    #[error("Patient {first_name} {last_name} with that date of birth is already registered")]
    Duplicate {
        first_name: String,
        last_name: String,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<StoreError> for PatientError {
    fn from(err: StoreError) -> Self {
        PatientError::Database(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterPatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PatientLookupQuery {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SaveInsuranceRequest {
    pub carrier: String,
    pub member_id: String,
    pub group_id: Option<String>,
}
