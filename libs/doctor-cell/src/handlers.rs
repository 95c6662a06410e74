use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::{AppError, AppState};

use crate::models::{AvailabilityResponse, DoctorError};
use crate::services::{AvailabilityService, DoctorService};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound(id) => AppError::NotFound(format!("Doctor {} not found", id)),
            DoctorError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let doctors = DoctorService::new(state).list()?;
    Ok(Json(json!({ "doctors": doctors })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(state).get(id)?;
    Ok(Json(json!({ "doctor": doctor })))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let slots = AvailabilityService::new(state).available_slots(id, query.date)?;
    Ok(Json(AvailabilityResponse {
        doctor_id: id,
        date: query.date,
        available_slots: slots
            .into_iter()
            .map(|slot| slot.format("%H:%M").to_string())
            .collect(),
    }))
}
