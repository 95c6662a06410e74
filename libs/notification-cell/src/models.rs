use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Sms,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Email => write!(f, "email"),
            Channel::Sms => write!(f, "sms"),
        }
    }
}

/// Outcome of one simulated send.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    pub channel: Channel,
    pub recipient: Option<String>,
    pub delivered: bool,
}

impl DeliveryReport {
    pub fn delivered(channel: Channel, recipient: &str) -> Self {
        Self {
            channel,
            recipient: Some(recipient.to_string()),
            delivered: true,
        }
    }

    pub fn no_recipient(channel: Channel) -> Self {
        Self {
            channel,
            recipient: None,
            delivered: false,
        }
    }
}
