//! Reminder scheduling and dispatch.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use notification_cell::services::templates::{self, AppointmentDetails};
use notification_cell::{DeliveryReport, NotificationSender};
use shared_models::AppState;
use shared_store::models::{Appointment, Reminder, ReminderStatus};
use shared_store::{insert_reminder, StoreResult};
use tracing::info;

use crate::models::ScheduleError;

/// Reminders go out at 09:00 on their day.
pub fn send_time() -> NaiveTime {
    match NaiveTime::from_hms_opt(9, 0, 0) {
        Some(time) => time,
        None => unreachable!("09:00:00 is a valid time of day"),
    }
}

/// One `"{d}-day"` entry per offset, at 09:00 on `date - d`. Entries
/// already in the past are skipped.
pub fn reminder_times(
    date: NaiveDate,
    offsets: &[i64],
    now: DateTime<Utc>,
) -> Vec<(String, DateTime<Utc>)> {
    let mut times: Vec<(String, DateTime<Utc>)> = offsets
        .iter()
        .map(|days| {
            let when = (date - Duration::days(*days)).and_time(send_time()).and_utc();
            (format!("{}-day", days), when)
        })
        .filter(|(_, when)| *when > now)
        .collect();
    times.sort_by_key(|(_, when)| *when);
    times
}

/// Insert pending reminders for a fresh booking. Runs on the booking
/// transaction's connection.
pub fn schedule_reminders(
    conn: &Connection,
    appointment: &Appointment,
    offsets: &[i64],
    now: DateTime<Utc>,
) -> StoreResult<Vec<Reminder>> {
    let mut reminders = Vec::new();
    for (reminder_type, scheduled_time) in
        reminder_times(appointment.appointment_date, offsets, now)
    {
        reminders.push(insert_reminder(
            conn,
            appointment.id,
            &reminder_type,
            scheduled_time,
        )?);
    }
    Ok(reminders)
}

/// Outcome of dispatching one due reminder.
#[derive(Debug, Serialize)]
pub struct DispatchReport {
    pub reminder_id: i64,
    pub appointment_id: i64,
    pub reminder_type: String,
    pub status: ReminderStatus,
    pub deliveries: Vec<DeliveryReport>,
}

pub struct ReminderDispatcher {
    state: Arc<AppState>,
}

impl ReminderDispatcher {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Send every pending reminder due at `now`. Each becomes `sent`
    /// when at least one channel delivered, `failed` otherwise.
    pub fn dispatch_due(&self, now: DateTime<Utc>) -> Result<Vec<DispatchReport>, ScheduleError> {
        let due = self.state.store.due_reminders(now)?;
        let sender = NotificationSender::new(&self.state.config);

        let mut reports = Vec::with_capacity(due.len());
        for item in due {
            let details = AppointmentDetails {
                patient_name: item.patient_name.clone(),
                doctor_name: item.doctor_name.clone(),
                date: item.appointment_date,
                time: item.appointment_time,
            };
            let email = templates::reminder_email(&details, &item.reminder.reminder_type);
            let sms = templates::reminder_sms(&details, &item.reminder.reminder_type);

            let deliveries = vec![
                sender.send_email(item.patient_email.as_deref(), &email.subject, &email.body),
                sender.send_sms(item.patient_phone.as_deref(), &sms),
            ];
            let status = if deliveries.iter().any(|d| d.delivered) {
                ReminderStatus::Sent
            } else {
                ReminderStatus::Failed
            };
            self.state
                .store
                .set_reminder_status(item.reminder.id, status)?;
            reports.push(DispatchReport {
                reminder_id: item.reminder.id,
                appointment_id: item.reminder.appointment_id,
                reminder_type: item.reminder.reminder_type.clone(),
                status,
                deliveries,
            });
        }
        info!(dispatched = reports.len(), "reminder dispatch finished");
        Ok(reports)
    }
}
