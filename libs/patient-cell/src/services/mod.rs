pub mod forms;
pub mod patient;

pub use forms::IntakeFormsService;
pub use patient::PatientService;
