//! Message copy for the simulated channels.

use chrono::{NaiveDate, NaiveTime};

/// Rendered email content.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

/// Details shared by every appointment-related message.
#[derive(Debug, Clone)]
pub struct AppointmentDetails {
    pub patient_name: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl AppointmentDetails {
    fn when(&self) -> String {
        format!("{} at {}", self.date, self.time.format("%H:%M"))
    }
}

pub fn confirmation_email(details: &AppointmentDetails) -> EmailMessage {
    EmailMessage {
        subject: "Your Medical Appointment Confirmation".to_string(),
        body: format!(
            "Dear {},\n\nYour appointment has been scheduled successfully:\n\
             Date: {}\nTime: {}\nDoctor: {}\n\n\
             Please arrive 15 minutes before your scheduled appointment time.\n\
             If you need to reschedule or cancel, please contact us at least 24 hours in advance.",
            details.patient_name,
            details.date,
            details.time.format("%H:%M"),
            details.doctor_name,
        ),
    }
}

pub fn confirmation_sms(details: &AppointmentDetails) -> String {
    format!(
        "Appointment confirmed with {} on {}. Reply Y to confirm or call to reschedule.",
        details.doctor_name,
        details.when()
    )
}

pub fn reminder_email(details: &AppointmentDetails, reminder_type: &str) -> EmailMessage {
    match reminder_type {
        "7-day" => EmailMessage {
            subject: "Upcoming Appointment Reminder".to_string(),
            body: format!(
                "Dear {},\n\nThis is a friendly reminder about your upcoming appointment \
                 with {} on {}.\n\nPlease arrive 15 minutes early.",
                details.patient_name,
                details.doctor_name,
                details.when()
            ),
        },
        "3-day" => EmailMessage {
            subject: "Important: Appointment Forms Reminder".to_string(),
            body: format!(
                "Dear {},\n\nYour appointment with {} on {} is coming up soon.\n\n\
                 Have you completed your intake forms? If not, please complete them before \
                 your appointment to save time.",
                details.patient_name,
                details.doctor_name,
                details.when()
            ),
        },
        "1-day" => EmailMessage {
            subject: "FINAL REMINDER: Your Appointment Tomorrow".to_string(),
            body: format!(
                "Dear {},\n\nThis is your final reminder about your appointment tomorrow \
                 with {} at {}.\n\nIf you need to cancel, please let us know immediately \
                 and provide a reason.",
                details.patient_name,
                details.doctor_name,
                details.time.format("%H:%M")
            ),
        },
        _ => EmailMessage {
            subject: "Appointment Reminder".to_string(),
            body: format!(
                "Dear {},\n\nReminder: you have an appointment with {} on {}.",
                details.patient_name,
                details.doctor_name,
                details.when()
            ),
        },
    }
}

pub fn reminder_sms(details: &AppointmentDetails, reminder_type: &str) -> String {
    match reminder_type {
        "1-day" => format!(
            "FINAL REMINDER: Appointment tomorrow with {} at {}. Reply Y to confirm.",
            details.doctor_name,
            details.time.format("%H:%M")
        ),
        "3-day" => format!(
            "Reminder: Appointment with {} on {}. Have you completed your forms? \
             Reply Y to confirm or call to reschedule.",
            details.doctor_name,
            details.when()
        ),
        _ => format!(
            "Reminder: You have an appointment with {} on {}. Reply Y to confirm \
             or call to reschedule.",
            details.doctor_name,
            details.when()
        ),
    }
}

pub fn intake_forms_email(patient_name: &str, form_types: &[&str]) -> EmailMessage {
    let form_list = form_types
        .iter()
        .map(|t| format!("- {}", t.replace('_', " ")))
        .collect::<Vec<_>>()
        .join("\n");
    EmailMessage {
        subject: "Your Intake Forms".to_string(),
        body: format!(
            "Dear {},\n\nPlease complete the following forms before your visit:\n{}\n\n\
             Completing them ahead of time shortens your check-in.",
            patient_name, form_list
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> AppointmentDetails {
        AppointmentDetails {
            patient_name: "Maria Santos".into(),
            doctor_name: "Dr. Sarah Chen".into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn reminder_copy_varies_by_offset() {
        let d = details();
        let week = reminder_email(&d, "7-day");
        let day = reminder_email(&d, "1-day");
        assert_ne!(week.subject, day.subject);
        assert!(day.subject.contains("FINAL"));
        assert!(week.body.contains("2025-03-20"));
        assert!(reminder_sms(&d, "1-day").contains("tomorrow"));
    }

    #[test]
    fn confirmation_sms_mentions_doctor_and_slot() {
        let text = confirmation_sms(&details());
        assert!(text.contains("Dr. Sarah Chen"));
        assert!(text.contains("2025-03-20 at 10:30"));
    }

    #[test]
    fn forms_email_lists_readable_form_names() {
        let msg = intake_forms_email("Maria Santos", &["patient_information", "medical_history"]);
        assert!(msg.body.contains("- patient information"));
        assert!(msg.body.contains("- medical history"));
    }
}
