//! Booking orchestration and lifecycle operations.

use std::sync::Arc;

use chrono::Utc;
use doctor_cell::availability::free_slots;
use notification_cell::services::templates::{self, AppointmentDetails};
use notification_cell::{DeliveryReport, NotificationSender};
use shared_models::AppState;
use shared_store::models::{Appointment, AppointmentStatus, NewAppointment, Reminder};
use shared_store::{
    booked_on, count_for_patient, find_appointment, find_doctor, find_patient, insert_appointment,
    set_appointment_status, StoreError,
};
use tracing::{info, warn};

use crate::models::{
    parse_time_of_day, BookAppointmentRequest, ScheduleError, NEW_PATIENT_DURATION_MINUTES,
    RETURNING_PATIENT_DURATION_MINUTES,
};
use crate::services::lifecycle::AppointmentLifecycle;
use crate::services::reminders::schedule_reminders;

pub struct BookingService {
    state: Arc<AppState>,
}

impl BookingService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Book an appointment. Validation, conflict detection, the insert
    /// and reminder scheduling all run in one transaction, so a failed
    /// step leaves nothing behind.
    pub fn book(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<(Appointment, Vec<Reminder>), ScheduleError> {
        let time = parse_time_of_day(&request.appointment_time)?;
        let offsets = self.state.config.reminder_days.clone();
        let now = Utc::now();

        let (appointment, reminders) = self.state.store.with_tx(|tx| {
            find_patient(tx, request.patient_id)?
                .ok_or(ScheduleError::PatientNotFound(request.patient_id))?;
            find_doctor(tx, request.doctor_id)?
                .ok_or(ScheduleError::DoctorNotFound(request.doctor_id))?;

            let booked = booked_on(tx, request.doctor_id, request.appointment_date)?;
            if !free_slots(&booked).contains(&time) {
                return Err(ScheduleError::SlotUnavailable {
                    date: request.appointment_date,
                    time,
                });
            }

            let prior = count_for_patient(tx, request.patient_id)?;
            let duration_minutes = if prior == 0 {
                NEW_PATIENT_DURATION_MINUTES
            } else {
                RETURNING_PATIENT_DURATION_MINUTES
            };

            let appointment = insert_appointment(
                tx,
                &NewAppointment {
                    patient_id: request.patient_id,
                    doctor_id: request.doctor_id,
                    appointment_date: request.appointment_date,
                    appointment_time: time,
                    duration_minutes,
                    notes: request.notes.clone(),
                },
            )
            .map_err(|err| match err {
                // A concurrent booking can still win the slot between
                // our availability check and the insert.
                StoreError::Constraint(_) => ScheduleError::SlotUnavailable {
                    date: request.appointment_date,
                    time,
                },
                other => other.into(),
            })?;

            let reminders = schedule_reminders(tx, &appointment, &offsets, now)?;
            Ok((appointment, reminders))
        })?;

        info!(
            appointment_id = appointment.id,
            patient_id = appointment.patient_id,
            doctor_id = appointment.doctor_id,
            duration = appointment.duration_minutes,
            reminders = reminders.len(),
            "booked appointment"
        );
        Ok((appointment, reminders))
    }

    pub fn get(&self, id: i64) -> Result<Appointment, ScheduleError> {
        self.state
            .store
            .find_appointment(id)?
            .ok_or(ScheduleError::NotFound(id))
    }

    /// Confirm and notify. Delivery problems never undo the
    /// confirmation.
    pub fn confirm(&self, id: i64) -> Result<(Appointment, Vec<DeliveryReport>), ScheduleError> {
        let appointment = self.transition(id, AppointmentStatus::Confirmed, |_| None)?;
        let deliveries = self.send_confirmation(&appointment);
        Ok((appointment, deliveries))
    }

    pub fn complete(&self, id: i64) -> Result<Appointment, ScheduleError> {
        self.transition(id, AppointmentStatus::Completed, |_| None)
    }

    pub fn cancel(&self, id: i64, reason: Option<String>) -> Result<Appointment, ScheduleError> {
        self.transition(id, AppointmentStatus::Cancelled, |current| {
            reason.map(|reason| match &current.notes {
                Some(existing) => format!("{}\nCancelled: {}", existing, reason),
                None => format!("Cancelled: {}", reason),
            })
        })
    }

    /// Read, validate and write under one transaction so two requests
    /// racing on the same appointment cannot both pass validation.
    fn transition(
        &self,
        id: i64,
        to: AppointmentStatus,
        notes: impl FnOnce(&Appointment) -> Option<String>,
    ) -> Result<Appointment, ScheduleError> {
        let (from, updated) = self.state.store.with_tx::<_, ScheduleError>(|tx| {
            let current = find_appointment(tx, id)?.ok_or(ScheduleError::NotFound(id))?;
            AppointmentLifecycle::validate_transition(current.status, to)?;
            let notes = notes(&current);
            set_appointment_status(tx, id, to, notes.as_deref())?;
            let updated = find_appointment(tx, id)?.ok_or(ScheduleError::NotFound(id))?;
            Ok((current.status, updated))
        })?;
        info!(appointment_id = id, from = %from, to = %to, "status updated");
        Ok(updated)
    }

    fn send_confirmation(&self, appointment: &Appointment) -> Vec<DeliveryReport> {
        let patient = match self.state.store.find_patient(appointment.patient_id) {
            Ok(Some(patient)) => patient,
            _ => {
                warn!(
                    appointment_id = appointment.id,
                    "skipping confirmation notice, patient record unavailable"
                );
                return Vec::new();
            }
        };
        let doctor = match self.state.store.find_doctor(appointment.doctor_id) {
            Ok(Some(doctor)) => doctor,
            _ => {
                warn!(
                    appointment_id = appointment.id,
                    "skipping confirmation notice, doctor record unavailable"
                );
                return Vec::new();
            }
        };

        let details = AppointmentDetails {
            patient_name: patient.full_name(),
            doctor_name: doctor.full_name(),
            date: appointment.appointment_date,
            time: appointment.appointment_time,
        };
        let email = templates::confirmation_email(&details);
        let sms = templates::confirmation_sms(&details);
        let sender = NotificationSender::new(&self.state.config);
        vec![
            sender.send_email(patient.email.as_deref(), &email.subject, &email.body),
            sender.send_sms(patient.phone.as_deref(), &sms),
        ]
    }
}
