//! Patient store operations.

use super::{
    next_id, read_collection, write_collection, Database, DbResult, APPOINTMENTS_KEY, PATIENTS_KEY,
};
use crate::models::{Appointment, NewPatient, Patient, PatientUpdate};

impl Database {
    /// Create a new patient. Assigns the next id and stamps `created_at`.
    pub fn create_patient(&self, fields: NewPatient) -> DbResult<Patient> {
        let mut patients: Vec<Patient> = self.read_collection(PATIENTS_KEY)?;
        let patient = Patient::new(next_id(patients.iter().map(|p| p.id)), fields);
        patients.push(patient.clone());
        self.write_collection(PATIENTS_KEY, &patients)?;
        Ok(patient)
    }

    /// List all patients in storage (insertion) order.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        self.read_collection(PATIENTS_KEY)
    }

    /// Get a patient by id.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        let patients: Vec<Patient> = self.read_collection(PATIENTS_KEY)?;
        Ok(patients.into_iter().find(|p| p.id == id))
    }

    /// Merge a partial update over an existing patient.
    ///
    /// Returns the merged record, or `None` without writing when no patient
    /// has that id.
    pub fn update_patient(&self, id: i64, update: PatientUpdate) -> DbResult<Option<Patient>> {
        let mut patients: Vec<Patient> = self.read_collection(PATIENTS_KEY)?;
        let Some(patient) = patients.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        patient.apply(update);
        let updated = patient.clone();
        self.write_collection(PATIENTS_KEY, &patients)?;
        Ok(Some(updated))
    }

    /// Delete a patient and every appointment referencing it.
    ///
    /// Both collection writes commit in one transaction, so the patient and
    /// its appointments are never observable in a half-removed state.
    /// Deleting an absent id is a no-op success.
    pub fn delete_patient(&mut self, id: i64) -> DbResult<()> {
        let tx = self.transaction()?;

        let mut patients: Vec<Patient> = read_collection(&tx, PATIENTS_KEY)?;
        patients.retain(|p| p.id != id);
        write_collection(&tx, PATIENTS_KEY, &patients)?;

        let mut appointments: Vec<Appointment> = read_collection(&tx, APPOINTMENTS_KEY)?;
        let before = appointments.len();
        appointments.retain(|a| a.patient_id != id);
        let removed = before - appointments.len();
        write_collection(&tx, APPOINTMENTS_KEY, &appointments)?;

        tx.commit()?;
        if removed > 0 {
            tracing::debug!(patient_id = id, removed, "cascaded appointment removal");
        }
        Ok(())
    }

    /// Search patients by name, cpf, or email substring.
    pub fn search_patients(&self, query: &str) -> DbResult<Vec<Patient>> {
        let patients: Vec<Patient> = self.read_collection(PATIENTS_KEY)?;
        Ok(patients.into_iter().filter(|p| p.matches(query)).collect())
    }
}
