use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::{AppError, AppState};

use crate::models::{
    PatientError, PatientLookupQuery, RegisterPatientRequest, SaveInsuranceRequest,
};
use crate::services::{IntakeFormsService, PatientService};

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound(id) => AppError::NotFound(format!("Patient {} not found", id)),
            PatientError::Duplicate { .. } => AppError::Conflict(err.to_string()),
            PatientError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn register_patient(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterPatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient = PatientService::new(state).register(request)?;
    Ok(Json(json!({
        "success": true,
        "patient": patient,
        "message": "Patient registered successfully"
    })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let patient = PatientService::new(state).get(id)?;
    Ok(Json(json!({ "patient": patient })))
}

/// Lookup by name and date of birth; a miss is a normal response, not
/// an error.
#[axum::debug_handler]
pub async fn lookup_patient(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PatientLookupQuery>,
) -> Result<Json<Value>, AppError> {
    let patient = PatientService::new(state).lookup(
        &query.first_name,
        &query.last_name,
        query.date_of_birth,
    )?;
    match patient {
        Some(patient) => Ok(Json(json!({ "found": true, "patient": patient }))),
        None => Ok(Json(json!({ "found": false }))),
    }
}

#[axum::debug_handler]
pub async fn save_insurance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<SaveInsuranceRequest>,
) -> Result<Json<Value>, AppError> {
    let insurance = PatientService::new(state).save_insurance(id, request)?;
    Ok(Json(json!({
        "success": true,
        "insurance": insurance
    })))
}

#[axum::debug_handler]
pub async fn send_intake_forms(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let (forms, delivery) = IntakeFormsService::new(state).send_intake_forms(id)?;
    Ok(Json(json!({
        "success": true,
        "forms": forms,
        "delivery": delivery
    })))
}
