//! Patient models.

use serde::{Deserialize, Serialize};

/// A patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Store-assigned integer id, unique within the patient collection
    pub id: i64,
    /// Patient name
    pub name: String,
    /// National id string, stored as typed (no checksum validation)
    pub cpf: String,
    /// Date of birth (`YYYY-MM-DD`)
    pub birth_date: String,
    /// Contact phone, digits and punctuation
    pub phone: String,
    /// Contact email
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Additional notes
    pub notes: Option<String>,
    /// Creation timestamp, never changed after creation
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Field values for creating a patient. The store assigns `id` and the
/// timestamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub name: String,
    pub cpf: String,
    pub birth_date: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for a patient. `None` fields are left unchanged. `id` and
/// `created_at` are not representable here, so callers cannot alter them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl Patient {
    /// Build a record from its store-assigned id and the supplied fields.
    pub fn new(id: i64, fields: NewPatient) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            name: fields.name,
            cpf: fields.cpf,
            birth_date: fields.birth_date,
            phone: fields.phone,
            email: fields.email,
            address: fields.address,
            notes: fields.notes,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Merge a partial update over this record and refresh `updated_at`.
    pub fn apply(&mut self, update: PatientUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(cpf) = update.cpf {
            self.cpf = cpf;
        }
        if let Some(birth_date) = update.birth_date {
            self.birth_date = birth_date;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        self.touch();
    }

    /// Check whether the query matches this patient. Name and email match
    /// case-insensitively; the cpf matches on the raw query text.
    pub fn matches(&self, query: &str) -> bool {
        let lower = query.to_lowercase();
        self.name.to_lowercase().contains(&lower)
            || self.cpf.contains(query)
            || self
                .email
                .as_ref()
                .is_some_and(|email| email.to_lowercase().contains(&lower))
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}
