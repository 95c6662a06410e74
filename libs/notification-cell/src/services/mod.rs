pub mod sender;
pub mod templates;

pub use sender::NotificationSender;
