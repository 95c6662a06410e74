pub mod booking;
pub mod export;
pub mod lifecycle;
pub mod reminders;

pub use booking::BookingService;
pub use export::AppointmentExport;
pub use lifecycle::AppointmentLifecycle;
pub use reminders::ReminderDispatcher;
