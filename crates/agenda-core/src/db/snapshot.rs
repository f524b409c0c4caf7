//! Whole-store snapshot export, import, and reset.

use serde::{Deserialize, Serialize};

use super::{write_collection, Database, DbResult, APPOINTMENTS_KEY, PATIENTS_KEY};
use crate::models::{Appointment, Patient};

/// A point-in-time copy of the store's collections.
///
/// On export both collections are present. On import a `None` collection is
/// skipped, so a snapshot can replace one collection and leave the other
/// untouched. Imports replace wholesale; nothing is merged and the
/// patient references of imported appointments are not validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// Export timestamp
    pub exported_at: String,
    /// Patient collection
    #[serde(default)]
    pub patients: Option<Vec<Patient>>,
    /// Appointment collection
    #[serde(default)]
    pub appointments: Option<Vec<Appointment>>,
}

impl Snapshot {
    /// Encode to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Decode from JSON.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl Database {
    /// Export both collections as a snapshot.
    pub fn export_snapshot(&self) -> DbResult<Snapshot> {
        Ok(Snapshot {
            exported_at: chrono::Utc::now().to_rfc3339(),
            patients: Some(self.read_collection(PATIENTS_KEY)?),
            appointments: Some(self.read_collection(APPOINTMENTS_KEY)?),
        })
    }

    /// Replace collections from a snapshot. Collections absent from the
    /// snapshot are left as they are. Both replacements commit together.
    pub fn import_snapshot(&mut self, snapshot: &Snapshot) -> DbResult<()> {
        let tx = self.transaction()?;
        if let Some(patients) = &snapshot.patients {
            write_collection(&tx, PATIENTS_KEY, patients)?;
        }
        if let Some(appointments) = &snapshot.appointments {
            write_collection(&tx, APPOINTMENTS_KEY, appointments)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Clear both collections back to empty.
    pub fn reset(&mut self) -> DbResult<()> {
        let tx = self.transaction()?;
        write_collection::<Patient>(&tx, PATIENTS_KEY, &[])?;
        write_collection::<Appointment>(&tx, APPOINTMENTS_KEY, &[])?;
        tx.commit()?;
        tracing::debug!("collections reset to empty");
        Ok(())
    }
}
