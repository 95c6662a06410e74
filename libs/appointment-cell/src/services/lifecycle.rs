//! Appointment status state machine.

use shared_store::models::AppointmentStatus;

use crate::models::ScheduleError;

pub struct AppointmentLifecycle;

impl AppointmentLifecycle {
    /// Statuses reachable in one step from `current`. Terminal states
    /// have no successors.
    pub fn valid_transitions(current: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            AppointmentStatus::Scheduled => {
                vec![AppointmentStatus::Confirmed, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Confirmed => {
                vec![AppointmentStatus::Completed, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Cancelled | AppointmentStatus::Completed => vec![],
        }
    }

    pub fn is_terminal(status: AppointmentStatus) -> bool {
        matches!(
            status,
            AppointmentStatus::Cancelled | AppointmentStatus::Completed
        )
    }

    pub fn validate_transition(
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<(), ScheduleError> {
        if Self::valid_transitions(from).contains(&to) {
            Ok(())
        } else {
            Err(ScheduleError::InvalidTransition { from, to })
        }
    }
}
