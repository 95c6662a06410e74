use std::env;
use tracing::warn;

/// Default reminder offsets, in days before the appointment.
pub const DEFAULT_REMINDER_DAYS: [i64; 3] = [7, 3, 1];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub reminder_days: Vec<i64>,
    pub email_from: String,
    pub sms_from: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| {
                warn!("DATABASE_PATH not set, using default");
                "data/clinic.sqlite".to_string()
            }),
            reminder_days: env::var("REMINDER_DAYS")
                .map(|raw| parse_reminder_days(&raw))
                .unwrap_or_else(|_| {
                    warn!("REMINDER_DAYS not set, using default 7,3,1");
                    DEFAULT_REMINDER_DAYS.to_vec()
                }),
            email_from: env::var("EMAIL_FROM").unwrap_or_else(|_| {
                warn!("EMAIL_FROM not set, using default sender");
                "scheduling@clinic.example".to_string()
            }),
            sms_from: env::var("SMS_FROM").unwrap_or_else(|_| {
                warn!("SMS_FROM not set, using default sender");
                "+15550100000".to_string()
            }),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "data/clinic.sqlite".to_string(),
            reminder_days: DEFAULT_REMINDER_DAYS.to_vec(),
            email_from: "scheduling@clinic.example".to_string(),
            sms_from: "+15550100000".to_string(),
        }
    }
}

fn parse_reminder_days(raw: &str) -> Vec<i64> {
    let days: Vec<i64> = raw
        .split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .filter(|d| *d > 0)
        .collect();

    if days.is_empty() {
        warn!("REMINDER_DAYS contained no usable offsets, using default 7,3,1");
        DEFAULT_REMINDER_DAYS.to_vec()
    } else {
        days
    }
}
