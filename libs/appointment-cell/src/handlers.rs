use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use shared_models::{AppError, AppState};

use crate::models::{BookAppointmentRequest, CancelAppointmentRequest, ScheduleError};
use crate::services::{AppointmentExport, BookingService, ReminderDispatcher};

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::NotFound(_)
            | ScheduleError::PatientNotFound(_)
            | ScheduleError::DoctorNotFound(_) => AppError::NotFound(err.to_string()),
            ScheduleError::SlotUnavailable { .. } => AppError::Conflict(err.to_string()),
            ScheduleError::InvalidTransition { .. } | ScheduleError::InvalidTime(_) => {
                AppError::BadRequest(err.to_string())
            }
            ScheduleError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let (appointment, reminders) = BookingService::new(state).book(request)?;
    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "reminders": reminders,
        "message": "Appointment booked successfully"
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let appointment = BookingService::new(state).get(id)?;
    Ok(Json(json!({ "appointment": appointment })))
}

#[axum::debug_handler]
pub async fn confirm_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let (appointment, deliveries) = BookingService::new(state).confirm(id)?;
    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "notifications": deliveries
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Option<Json<CancelAppointmentRequest>>,
) -> Result<Json<Value>, AppError> {
    let reason = request.and_then(|Json(body)| body.reason);
    let appointment = BookingService::new(state).cancel(id, reason)?;
    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let appointment = BookingService::new(state).complete(id)?;
    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn list_reminders(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    BookingService::new(state.clone()).get(id)?;
    let reminders = state.store.list_reminders_for_appointment(id)?;
    Ok(Json(json!({ "reminders": reminders })))
}

#[axum::debug_handler]
pub async fn dispatch_reminders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let reports = ReminderDispatcher::new(state).dispatch_due(Utc::now())?;
    Ok(Json(json!({
        "dispatched": reports.len(),
        "reports": reports
    })))
}

#[axum::debug_handler]
pub async fn export_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let export = AppointmentExport::new(state.store.export_rows(Some(id))?);
    if export.is_empty() {
        return Err(AppError::NotFound(format!("Appointment {} not found", id)));
    }
    Ok(([(header::CONTENT_TYPE, "text/csv")], export.to_csv()))
}

#[axum::debug_handler]
pub async fn export_all_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let export = AppointmentExport::new(state.store.export_rows(None)?);
    Ok(([(header::CONTENT_TYPE, "text/csv")], export.to_csv()))
}
