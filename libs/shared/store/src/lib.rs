//! SQLite persistence layer for the scheduling service.

mod schema;
pub mod models;

mod appointments;
mod doctors;
mod export;
mod forms;
mod insurance;
mod patients;
mod reminders;
mod seed;

pub use appointments::{
    booked_on, count_for_patient, find_appointment, insert_appointment, set_appointment_status,
};
pub use doctors::{find_doctor, insert_doctor};
pub use export::ExportRow;
pub use patients::{find_patient, find_patient_by_name_dob, insert_patient};
pub use reminders::{insert_reminder, DueReminder};
pub use schema::SCHEMA;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction};
use thiserror::Error;

/// Persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Database connection wrapper shared across cells.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> StoreResult<()> {
        self.lock().execute_batch(SCHEMA)?;
        Ok(())
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        // A poisoned mutex means a writer panicked mid-operation; the
        // connection itself is still usable.
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run a closure against the raw connection.
    pub fn with_conn<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let conn = self.lock();
        f(&conn)
    }

    /// Run a closure inside a transaction. Commits on `Ok`, rolls back
    /// (by dropping the transaction) on `Err`.
    pub fn with_tx<T, E>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut conn = self.lock();
        let tx = conn
            .transaction()
            .map_err(StoreError::from)
            .map_err(E::from)?;
        let value = f(&tx)?;
        tx.commit().map_err(StoreError::from).map_err(E::from)?;
        Ok(value)
    }
}

/// True when the error is a SQLite uniqueness/constraint failure.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
