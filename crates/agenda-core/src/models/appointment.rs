//! Appointment models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Appointment status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    /// Booked, not yet confirmed with the patient
    Scheduled,
    /// Confirmed with the patient
    Confirmed,
    /// The visit happened
    Completed,
    /// Called off; excluded from upcoming projections
    Cancelled,
}

/// An appointment record.
///
/// `patient_id` is a soft reference: it is not checked against the patient
/// collection on write and may point at a deleted patient. Projections that
/// display a patient name substitute a placeholder when it does not resolve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Store-assigned integer id, unique within the appointment collection
    pub id: i64,
    /// Referenced patient id (not enforced)
    pub patient_id: i64,
    /// Calendar date (`YYYY-MM-DD`)
    pub date: String,
    /// Time of day (`HH:MM`)
    pub time: String,
    /// Specialty label, open-ended set
    pub specialty: String,
    /// Current status
    pub status: AppointmentStatus,
    /// Additional notes
    pub notes: Option<String>,
    /// Creation timestamp, never changed after creation
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Field values for creating an appointment. The store assigns `id` and the
/// timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub date: String,
    pub time: String,
    pub specialty: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

/// Partial update for an appointment. `None` fields are left unchanged.
/// `id` and `created_at` are not representable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentUpdate {
    pub patient_id: Option<i64>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub specialty: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

impl Appointment {
    /// Build a record from its store-assigned id and the supplied fields.
    pub fn new(id: i64, fields: NewAppointment) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            patient_id: fields.patient_id,
            date: fields.date,
            time: fields.time,
            specialty: fields.specialty,
            status: fields.status,
            notes: fields.notes,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Merge a partial update over this record and refresh `updated_at`.
    pub fn apply(&mut self, update: AppointmentUpdate) {
        if let Some(patient_id) = update.patient_id {
            self.patient_id = patient_id;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(specialty) = update.specialty {
            self.specialty = specialty;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        self.touch();
    }

    /// The combined chronological instant of `date` and `time`.
    ///
    /// Returns `None` when the pair does not parse; such records drop out of
    /// instant-ordered projections instead of failing them.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(
            &format!("{} {}", self.date, self.time),
            "%Y-%m-%d %H:%M",
        )
        .ok()
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}
