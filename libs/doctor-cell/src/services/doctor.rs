use std::sync::Arc;

use shared_models::AppState;
use shared_store::models::Doctor;

use crate::models::DoctorError;

pub struct DoctorService {
    state: Arc<AppState>,
}

impl DoctorService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn list(&self) -> Result<Vec<Doctor>, DoctorError> {
        Ok(self.state.store.list_doctors()?)
    }

    pub fn get(&self, id: i64) -> Result<Doctor, DoctorError> {
        self.state
            .store
            .find_doctor(id)?
            .ok_or(DoctorError::NotFound(id))
    }
}
