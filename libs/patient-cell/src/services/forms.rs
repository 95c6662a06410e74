use std::sync::Arc;

use chrono::Utc;
use notification_cell::services::templates;
use notification_cell::{DeliveryReport, NotificationSender};
use shared_models::AppState;
use shared_store::models::Form;
use tracing::info;

use crate::models::{PatientError, INTAKE_FORM_TYPES};
use crate::services::PatientService;

pub struct IntakeFormsService {
    state: Arc<AppState>,
}

impl IntakeFormsService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Create the intake form records and email them in one message.
    /// Forms stay `pending` when the email cannot be delivered.
    pub fn send_intake_forms(
        &self,
        patient_id: i64,
    ) -> Result<(Vec<Form>, DeliveryReport), PatientError> {
        let patient = PatientService::new(self.state.clone()).get(patient_id)?;

        let mut forms = Vec::with_capacity(INTAKE_FORM_TYPES.len());
        for form_type in INTAKE_FORM_TYPES {
            forms.push(self.state.store.insert_form(patient_id, form_type)?);
        }

        let message = templates::intake_forms_email(&patient.full_name(), &INTAKE_FORM_TYPES);
        let sender = NotificationSender::new(&self.state.config);
        let report = sender.send_email(patient.email.as_deref(), &message.subject, &message.body);

        if report.delivered {
            let sent_at = Utc::now();
            for form in &mut forms {
                self.state.store.mark_form_sent(form.id, sent_at)?;
                form.status = shared_store::models::FormStatus::Sent;
                form.sent_at = Some(sent_at);
            }
        }
        info!(
            patient_id,
            delivered = report.delivered,
            count = forms.len(),
            "intake forms processed"
        );
        Ok((forms, report))
    }
}
