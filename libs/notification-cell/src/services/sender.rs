//! Simulated email and SMS delivery. Messages are rendered and logged
//! instead of leaving the process.

use shared_config::AppConfig;
use tracing::{info, warn};

use crate::models::{Channel, DeliveryReport};

#[derive(Debug, Clone)]
pub struct NotificationSender {
    email_from: String,
    sms_from: String,
}

impl NotificationSender {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            email_from: config.email_from.clone(),
            sms_from: config.sms_from.clone(),
        }
    }

    pub fn send_email(&self, to: Option<&str>, subject: &str, body: &str) -> DeliveryReport {
        match to {
            Some(address) => {
                info!(
                    from = %self.email_from,
                    to = %address,
                    subject = %subject,
                    body = %body,
                    "[SIMULATED EMAIL]"
                );
                DeliveryReport::delivered(Channel::Email, address)
            }
            None => {
                warn!(subject = %subject, "email skipped, no address on file");
                DeliveryReport::no_recipient(Channel::Email)
            }
        }
    }

    pub fn send_sms(&self, to: Option<&str>, body: &str) -> DeliveryReport {
        match to {
            Some(number) => {
                info!(
                    from = %self.sms_from,
                    to = %number,
                    body = %body,
                    "[SIMULATED SMS]"
                );
                DeliveryReport::delivered(Channel::Sms, number)
            }
            None => {
                warn!("sms skipped, no phone number on file");
                DeliveryReport::no_recipient(Channel::Sms)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_recipient_reports_undelivered() {
        let sender = NotificationSender::new(&AppConfig::default());
        let report = sender.send_email(None, "subject", "body");
        assert!(!report.delivered);
        assert!(report.recipient.is_none());

        let report = sender.send_sms(Some("+15550001111"), "hi");
        assert!(report.delivered);
        assert_eq!(report.recipient.as_deref(), Some("+15550001111"));
    }
}
