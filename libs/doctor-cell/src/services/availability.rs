//! Slot calendar: a fixed 30-minute grid over the clinic workday.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use shared_models::AppState;
use shared_store::models::Appointment;
use tracing::debug;

use crate::models::DoctorError;

pub const WORKDAY_START_HOUR: u32 = 9;
pub const WORKDAY_END_HOUR: u32 = 17;
pub const SLOT_MINUTES: i64 = 30;

/// Every slot start of the workday: 09:00 through 16:30 inclusive.
pub fn candidate_slots() -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    for hour in WORKDAY_START_HOUR..WORKDAY_END_HOUR {
        for minute in [0, 30] {
            if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                slots.push(time);
            }
        }
    }
    slots
}

/// Candidate grid minus slots occupied by the given bookings. An
/// appointment occupies `duration / 30` consecutive slots from its
/// start; occupied times outside the grid are ignored.
pub fn free_slots(booked: &[Appointment]) -> Vec<NaiveTime> {
    let mut slots = candidate_slots();
    for appointment in booked {
        let occupied = appointment.duration_minutes / SLOT_MINUTES;
        for i in 0..occupied {
            let taken = appointment.appointment_time + Duration::minutes(i * SLOT_MINUTES);
            slots.retain(|slot| *slot != taken);
        }
    }
    slots
}

pub struct AvailabilityService {
    state: Arc<AppState>,
}

impl AvailabilityService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Free slot starts for a doctor on a date, ascending.
    pub fn available_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, DoctorError> {
        self.state
            .store
            .find_doctor(doctor_id)?
            .ok_or(DoctorError::NotFound(doctor_id))?;

        let booked = self.state.store.booked_on(doctor_id, date)?;
        let slots = free_slots(&booked);
        debug!(
            doctor_id,
            %date,
            booked = booked.len(),
            free = slots.len(),
            "computed availability"
        );
        Ok(slots)
    }
}
