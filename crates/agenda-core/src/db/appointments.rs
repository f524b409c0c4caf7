//! Appointment store operations.

use chrono::Local;

use super::{next_id, Database, DbResult, APPOINTMENTS_KEY};
use crate::models::{Appointment, AppointmentStatus, AppointmentUpdate, NewAppointment};

/// Conventional limit for the upcoming-appointments listing.
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

impl Database {
    /// Create a new appointment. Assigns the next id in the appointment id
    /// space and stamps `created_at`. The referenced patient id is taken as
    /// given, it is not checked against the patient collection.
    pub fn create_appointment(&self, fields: NewAppointment) -> DbResult<Appointment> {
        let mut appointments: Vec<Appointment> = self.read_collection(APPOINTMENTS_KEY)?;
        let appointment = Appointment::new(next_id(appointments.iter().map(|a| a.id)), fields);
        appointments.push(appointment.clone());
        self.write_collection(APPOINTMENTS_KEY, &appointments)?;
        Ok(appointment)
    }

    /// List all appointments in storage (insertion) order.
    pub fn list_appointments(&self) -> DbResult<Vec<Appointment>> {
        self.read_collection(APPOINTMENTS_KEY)
    }

    /// Get an appointment by id.
    pub fn get_appointment(&self, id: i64) -> DbResult<Option<Appointment>> {
        let appointments: Vec<Appointment> = self.read_collection(APPOINTMENTS_KEY)?;
        Ok(appointments.into_iter().find(|a| a.id == id))
    }

    /// Merge a partial update over an existing appointment.
    ///
    /// Returns the merged record, or `None` without writing when no
    /// appointment has that id.
    pub fn update_appointment(
        &self,
        id: i64,
        update: AppointmentUpdate,
    ) -> DbResult<Option<Appointment>> {
        let mut appointments: Vec<Appointment> = self.read_collection(APPOINTMENTS_KEY)?;
        let Some(appointment) = appointments.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        appointment.apply(update);
        let updated = appointment.clone();
        self.write_collection(APPOINTMENTS_KEY, &appointments)?;
        Ok(Some(updated))
    }

    /// Delete an appointment. Deleting an absent id is a no-op success.
    pub fn delete_appointment(&self, id: i64) -> DbResult<()> {
        let mut appointments: Vec<Appointment> = self.read_collection(APPOINTMENTS_KEY)?;
        appointments.retain(|a| a.id != id);
        self.write_collection(APPOINTMENTS_KEY, &appointments)
    }

    /// List appointments on an exact date (`YYYY-MM-DD`).
    pub fn list_appointments_by_date(&self, date: &str) -> DbResult<Vec<Appointment>> {
        let appointments: Vec<Appointment> = self.read_collection(APPOINTMENTS_KEY)?;
        Ok(appointments.into_iter().filter(|a| a.date == date).collect())
    }

    /// List appointments with an exact specialty label.
    pub fn list_appointments_by_specialty(&self, specialty: &str) -> DbResult<Vec<Appointment>> {
        let appointments: Vec<Appointment> = self.read_collection(APPOINTMENTS_KEY)?;
        Ok(appointments
            .into_iter()
            .filter(|a| a.specialty == specialty)
            .collect())
    }

    /// List appointments referencing a patient id.
    pub fn list_appointments_for_patient(&self, patient_id: i64) -> DbResult<Vec<Appointment>> {
        let appointments: Vec<Appointment> = self.read_collection(APPOINTMENTS_KEY)?;
        Ok(appointments
            .into_iter()
            .filter(|a| a.patient_id == patient_id)
            .collect())
    }

    /// List appointments on today's date in the local calendar.
    pub fn list_today_appointments(&self) -> DbResult<Vec<Appointment>> {
        self.list_appointments_by_date(&local_date_string())
    }

    /// List the next appointments from the current instant onward.
    ///
    /// Keeps appointments whose combined instant is at or after now and
    /// whose status is not `Cancelled`, sorted ascending by instant. Ties
    /// keep their storage order. Truncated to `limit`.
    pub fn list_upcoming_appointments(&self, limit: usize) -> DbResult<Vec<Appointment>> {
        let now = Local::now().naive_local();
        let appointments: Vec<Appointment> = self.read_collection(APPOINTMENTS_KEY)?;

        let mut upcoming: Vec<Appointment> = appointments
            .into_iter()
            .filter(|a| a.status != AppointmentStatus::Cancelled)
            .filter(|a| a.instant().is_some_and(|instant| instant >= now))
            .collect();
        upcoming.sort_by_key(|a| a.instant());
        upcoming.truncate(limit);
        Ok(upcoming)
    }
}

/// Today's date in the local calendar as `YYYY-MM-DD`.
pub(crate) fn local_date_string() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
