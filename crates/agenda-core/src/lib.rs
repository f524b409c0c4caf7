//! Agenda Core Library
//!
//! Local-first appointment book for a small clinic: patient records,
//! appointment scheduling, and read-only dashboard projections over a
//! SQLite-backed collection store.
//!
//! # Architecture
//!
//! ```text
//!                     ┌──────────────────────────────┐
//!                     │            Agenda            │
//!                     │   Mutex over the connection  │
//!                     └──────────────┬───────────────┘
//!                                    │
//!             ┌──────────────────────┼──────────────────────┐
//!             ▼                      ▼                      ▼
//!      Patient Store         Appointment Store         Schedule
//!      (db/patients)         (db/appointments)      (query, read-only)
//!             │                      │                      │
//!             └──────────────────────┴──────────────────────┘
//!                                    │
//!                     ┌──────────────▼───────────────┐
//!                     │     collections table        │
//!                     │  'patients'     → JSON array │
//!                     │  'appointments' → JSON array │
//!                     └──────────────────────────────┘
//! ```
//!
//! Each store mutation is a whole-collection cycle: read the JSON array,
//! change it in memory, write it back. That cycle is not atomic on its own,
//! so [`Agenda`] serializes every operation behind one mutex. Deleting a
//! patient also removes its appointments, committed in one transaction.
//!
//! # Modules
//!
//! - [`db`]: SQLite-backed collection store (patients, appointments, snapshots)
//! - [`models`]: Domain types (Patient, Appointment, statuses, patches)
//! - [`query`]: Read-only schedule and dashboard projections

pub mod db;
pub mod models;
pub mod query;

// Re-export commonly used types
pub use db::{Database, DbError, Snapshot, DEFAULT_UPCOMING_LIMIT};
pub use models::{
    Appointment, AppointmentStatus, AppointmentUpdate, NewAppointment, NewPatient, Patient,
    PatientUpdate,
};
pub use query::{DashboardStats, Schedule, ScheduleEntry, ScheduleFilter, UNKNOWN_PATIENT};

use std::path::Path;
use std::sync::{Arc, Mutex};

/// Facade errors.
#[derive(Debug, thiserror::Error)]
pub enum AgendaError {
    #[error("Persistence failed: {0}")]
    Persistence(#[from] db::DbError),

    #[error("Store lock poisoned: {0}")]
    Lock(String),
}

impl<T> From<std::sync::PoisonError<T>> for AgendaError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        AgendaError::Lock(e.to_string())
    }
}

/// Thread-safe handle over the whole store.
///
/// Construct one per process (or per test) and hand clones of it to
/// whatever consumes the store. The mutex guards the read-modify-write
/// cycle of every operation.
#[derive(Clone)]
pub struct Agenda {
    db: Arc<Mutex<Database>>,
}

impl Agenda {
    /// Open or create the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AgendaError> {
        let db = Database::open(path)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, AgendaError> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Create a new patient.
    pub fn create_patient(&self, fields: NewPatient) -> Result<Patient, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.create_patient(fields)?)
    }

    /// List all patients.
    pub fn list_patients(&self) -> Result<Vec<Patient>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.list_patients()?)
    }

    /// Get a patient by id.
    pub fn get_patient(&self, id: i64) -> Result<Option<Patient>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.get_patient(id)?)
    }

    /// Update a patient. `None` when the id does not exist.
    pub fn update_patient(
        &self,
        id: i64,
        update: PatientUpdate,
    ) -> Result<Option<Patient>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.update_patient(id, update)?)
    }

    /// Delete a patient and cascade-delete its appointments.
    pub fn delete_patient(&self, id: i64) -> Result<(), AgendaError> {
        let mut db = self.db.lock()?;
        Ok(db.delete_patient(id)?)
    }

    /// Search patients by name, cpf, or email substring.
    pub fn search_patients(&self, query: &str) -> Result<Vec<Patient>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.search_patients(query)?)
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    /// Create a new appointment.
    pub fn create_appointment(&self, fields: NewAppointment) -> Result<Appointment, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.create_appointment(fields)?)
    }

    /// List all appointments.
    pub fn list_appointments(&self) -> Result<Vec<Appointment>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.list_appointments()?)
    }

    /// Get an appointment by id.
    pub fn get_appointment(&self, id: i64) -> Result<Option<Appointment>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.get_appointment(id)?)
    }

    /// Update an appointment. `None` when the id does not exist.
    pub fn update_appointment(
        &self,
        id: i64,
        update: AppointmentUpdate,
    ) -> Result<Option<Appointment>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.update_appointment(id, update)?)
    }

    /// Delete an appointment.
    pub fn delete_appointment(&self, id: i64) -> Result<(), AgendaError> {
        let db = self.db.lock()?;
        Ok(db.delete_appointment(id)?)
    }

    /// List appointments on an exact date (`YYYY-MM-DD`).
    pub fn list_appointments_by_date(&self, date: &str) -> Result<Vec<Appointment>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.list_appointments_by_date(date)?)
    }

    /// List appointments with an exact specialty label.
    pub fn list_appointments_by_specialty(
        &self,
        specialty: &str,
    ) -> Result<Vec<Appointment>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.list_appointments_by_specialty(specialty)?)
    }

    /// List appointments referencing a patient id.
    pub fn list_appointments_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<Appointment>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.list_appointments_for_patient(patient_id)?)
    }

    /// List appointments on today's local date.
    pub fn list_today_appointments(&self) -> Result<Vec<Appointment>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.list_today_appointments()?)
    }

    /// List the next `limit` non-cancelled appointments, soonest first.
    pub fn list_upcoming_appointments(&self, limit: usize) -> Result<Vec<Appointment>, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.list_upcoming_appointments(limit)?)
    }

    // =========================================================================
    // Schedule Projections
    // =========================================================================

    /// Aggregate dashboard counts.
    pub fn dashboard_stats(&self) -> Result<DashboardStats, AgendaError> {
        let db = self.db.lock()?;
        Ok(Schedule::new(&db).stats()?)
    }

    /// Appointments dated within the coming week, inclusive on both ends.
    pub fn week_appointments(&self) -> Result<Vec<Appointment>, AgendaError> {
        let db = self.db.lock()?;
        Ok(Schedule::new(&db).week_appointments()?)
    }

    /// The next `limit` appointments with patient names resolved.
    pub fn upcoming_schedule(&self, limit: usize) -> Result<Vec<ScheduleEntry>, AgendaError> {
        let db = self.db.lock()?;
        Ok(Schedule::new(&db).upcoming(limit)?)
    }

    /// The filtered appointment table, most recent first, with patient
    /// names resolved.
    pub fn schedule_listing(
        &self,
        filter: &ScheduleFilter,
    ) -> Result<Vec<ScheduleEntry>, AgendaError> {
        let db = self.db.lock()?;
        Ok(Schedule::new(&db).listing(filter)?)
    }

    // =========================================================================
    // Snapshot Operations
    // =========================================================================

    /// Export both collections as a snapshot.
    pub fn export_snapshot(&self) -> Result<Snapshot, AgendaError> {
        let db = self.db.lock()?;
        Ok(db.export_snapshot()?)
    }

    /// Replace collections wholesale from a snapshot.
    pub fn import_snapshot(&self, snapshot: &Snapshot) -> Result<(), AgendaError> {
        let mut db = self.db.lock()?;
        Ok(db.import_snapshot(snapshot)?)
    }

    /// Clear both collections back to empty.
    pub fn reset(&self) -> Result<(), AgendaError> {
        let mut db = self.db.lock()?;
        Ok(db.reset()?)
    }
}
