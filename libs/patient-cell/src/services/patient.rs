use std::sync::Arc;

use chrono::NaiveDate;
use shared_models::AppState;
use shared_store::models::{Insurance, NewPatient, Patient};
use shared_store::{find_patient_by_name_dob, insert_patient};
use tracing::{debug, info};

use crate::models::{PatientError, RegisterPatientRequest, SaveInsuranceRequest};

pub struct PatientService {
    state: Arc<AppState>,
}

impl PatientService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Register a patient. Same name (case-insensitive) plus date of
    /// birth as an existing record is a duplicate. The check and the
    /// insert share a transaction so identical concurrent requests
    /// cannot both get past the check.
    pub fn register(&self, request: RegisterPatientRequest) -> Result<Patient, PatientError> {
        let patient = self.state.store.with_tx(|tx| {
            let existing = find_patient_by_name_dob(
                tx,
                &request.first_name,
                &request.last_name,
                request.date_of_birth,
            )?;
            if existing.is_some() {
                debug!(
                    first_name = %request.first_name,
                    last_name = %request.last_name,
                    "registration rejected, patient already on file"
                );
                return Err(PatientError::Duplicate {
                    first_name: request.first_name,
                    last_name: request.last_name,
                });
            }

            insert_patient(
                tx,
                &NewPatient {
                    first_name: request.first_name,
                    last_name: request.last_name,
                    date_of_birth: request.date_of_birth,
                    email: request.email,
                    phone: request.phone,
                    address: request.address,
                },
            )
            .map_err(PatientError::from)
        })?;
        info!(patient_id = patient.id, "registered patient");
        Ok(patient)
    }

    pub fn get(&self, id: i64) -> Result<Patient, PatientError> {
        self.state
            .store
            .find_patient(id)?
            .ok_or(PatientError::NotFound(id))
    }

    pub fn lookup(
        &self,
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Option<Patient>, PatientError> {
        Ok(self
            .state
            .store
            .find_patient_by_name_dob(first_name, last_name, date_of_birth)?)
    }

    pub fn save_insurance(
        &self,
        patient_id: i64,
        request: SaveInsuranceRequest,
    ) -> Result<Insurance, PatientError> {
        self.get(patient_id)?;
        let insurance = self.state.store.upsert_insurance(
            patient_id,
            &request.carrier,
            &request.member_id,
            request.group_id.as_deref(),
        )?;
        info!(patient_id, carrier = %insurance.carrier, "saved insurance");
        Ok(insurance)
    }
}
