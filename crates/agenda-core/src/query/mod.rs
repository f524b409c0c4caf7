//! Read-only schedule and dashboard projections.
//!
//! Every projection recomputes from current store contents on each call.
//! Nothing here writes.

use std::collections::HashMap;

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

use crate::db::{Database, DbResult};
use crate::models::{Appointment, Patient};

/// Display name substituted when an appointment's patient id no longer
/// resolves to a patient record.
pub const UNKNOWN_PATIENT: &str = "Unknown patient";

/// Aggregate counts for the dashboard header.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_patients: usize,
    pub today_appointments: usize,
    pub week_appointments: usize,
    pub total_appointments: usize,
}

/// One appointment row with its patient's display name resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScheduleEntry {
    pub appointment: Appointment,
    pub patient_name: String,
}

/// Optional constraints for the appointment listing. Present constraints
/// must all hold; an absent one is no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleFilter {
    /// Exact date (`YYYY-MM-DD`)
    pub date: Option<String>,
    /// Exact specialty label
    pub specialty: Option<String>,
}

impl ScheduleFilter {
    fn matches(&self, appointment: &Appointment) -> bool {
        self.date.as_ref().is_none_or(|date| appointment.date == *date)
            && self
                .specialty
                .as_ref()
                .is_none_or(|specialty| appointment.specialty == *specialty)
    }
}

/// Projections over the patient and appointment stores.
pub struct Schedule<'a> {
    db: &'a Database,
}

impl<'a> Schedule<'a> {
    /// Create a new schedule view over the store.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Aggregate dashboard counts.
    pub fn stats(&self) -> DbResult<DashboardStats> {
        Ok(DashboardStats {
            total_patients: self.db.list_patients()?.len(),
            today_appointments: self.db.list_today_appointments()?.len(),
            week_appointments: self.week_appointments()?.len(),
            total_appointments: self.db.list_appointments()?.len(),
        })
    }

    /// Appointments dated within the next week, today and today+7 both
    /// inclusive, regardless of status. Undated (unparseable) records are
    /// excluded.
    pub fn week_appointments(&self) -> DbResult<Vec<Appointment>> {
        let today = Local::now().date_naive();
        let week_end = today + Days::new(7);

        let appointments = self.db.list_appointments()?;
        Ok(appointments
            .into_iter()
            .filter(|a| {
                NaiveDate::parse_from_str(&a.date, "%Y-%m-%d")
                    .is_ok_and(|date| date >= today && date <= week_end)
            })
            .collect())
    }

    /// The next `limit` appointments with patient names resolved, soonest
    /// first (the store's upcoming order).
    pub fn upcoming(&self, limit: usize) -> DbResult<Vec<ScheduleEntry>> {
        let upcoming = self.db.list_upcoming_appointments(limit)?;
        self.with_patient_names(upcoming)
    }

    /// The filtered appointment table, most recent instant first (the
    /// opposite direction of [`Schedule::upcoming`]), with patient names
    /// resolved. Pass `ScheduleFilter::default()` for the full table.
    pub fn listing(&self, filter: &ScheduleFilter) -> DbResult<Vec<ScheduleEntry>> {
        let appointments = self.db.list_appointments()?;
        let mut filtered: Vec<Appointment> = appointments
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect();
        filtered.sort_by(|a, b| b.instant().cmp(&a.instant()));
        self.with_patient_names(filtered)
    }

    fn with_patient_names(&self, appointments: Vec<Appointment>) -> DbResult<Vec<ScheduleEntry>> {
        let names: HashMap<i64, String> = self
            .db
            .list_patients()?
            .into_iter()
            .map(|p: Patient| (p.id, p.name))
            .collect();

        Ok(appointments
            .into_iter()
            .map(|appointment| {
                let patient_name = names
                    .get(&appointment.patient_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_PATIENT.to_string());
                ScheduleEntry {
                    appointment,
                    patient_name,
                }
            })
            .collect())
    }
}
