//! Schedule and dashboard projection tests, driven through the facade.

use agenda_core::{
    Agenda, AppointmentStatus, NewAppointment, NewPatient, ScheduleFilter, DEFAULT_UPCOMING_LIMIT,
    UNKNOWN_PATIENT,
};
use chrono::{Duration, Local, NaiveDateTime};

fn patient(name: &str) -> NewPatient {
    NewPatient {
        name: name.to_string(),
        cpf: "123.456.789-00".into(),
        birth_date: "1990-01-15".into(),
        phone: "(11) 98765-4321".into(),
        ..Default::default()
    }
}

fn appointment_at(
    patient_id: i64,
    instant: NaiveDateTime,
    status: AppointmentStatus,
) -> NewAppointment {
    NewAppointment {
        patient_id,
        date: instant.format("%Y-%m-%d").to_string(),
        time: instant.format("%H:%M").to_string(),
        specialty: "Clínico Geral".into(),
        status,
        notes: None,
    }
}

#[test]
fn test_upcoming_excludes_past_and_cancelled_and_truncates() {
    let agenda = Agenda::open_in_memory().unwrap();
    agenda.create_patient(patient("Ana Silva")).unwrap();
    let now = Local::now().naive_local();

    let plus_one = agenda
        .create_appointment(appointment_at(1, now + Duration::hours(1), AppointmentStatus::Scheduled))
        .unwrap();
    let plus_three = agenda
        .create_appointment(appointment_at(1, now + Duration::hours(3), AppointmentStatus::Scheduled))
        .unwrap();
    agenda
        .create_appointment(appointment_at(1, now - Duration::hours(1), AppointmentStatus::Scheduled))
        .unwrap();
    agenda
        .create_appointment(appointment_at(1, now + Duration::hours(2), AppointmentStatus::Cancelled))
        .unwrap();

    let upcoming = agenda.list_upcoming_appointments(2).unwrap();
    let ids: Vec<i64> = upcoming.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![plus_one.id, plus_three.id]);
}

#[test]
fn test_upcoming_ties_keep_storage_order() {
    let agenda = Agenda::open_in_memory().unwrap();
    agenda.create_patient(patient("Ana Silva")).unwrap();
    let instant = Local::now().naive_local() + Duration::hours(1);

    let first = agenda
        .create_appointment(appointment_at(1, instant, AppointmentStatus::Scheduled))
        .unwrap();
    let second = agenda
        .create_appointment(appointment_at(1, instant, AppointmentStatus::Confirmed))
        .unwrap();

    let upcoming = agenda
        .list_upcoming_appointments(DEFAULT_UPCOMING_LIMIT)
        .unwrap();
    let ids: Vec<i64> = upcoming.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn test_upcoming_schedule_resolves_names() {
    let agenda = Agenda::open_in_memory().unwrap();
    let ana = agenda.create_patient(patient("Ana Silva")).unwrap();
    let future = Local::now().naive_local() + Duration::hours(2);

    agenda
        .create_appointment(appointment_at(ana.id, future, AppointmentStatus::Confirmed))
        .unwrap();
    agenda
        .create_appointment(appointment_at(99, future + Duration::hours(1), AppointmentStatus::Scheduled))
        .unwrap();

    let schedule = agenda.upcoming_schedule(DEFAULT_UPCOMING_LIMIT).unwrap();
    let names: Vec<&str> = schedule.iter().map(|e| e.patient_name.as_str()).collect();
    assert_eq!(names, vec!["Ana Silva", UNKNOWN_PATIENT]);
}

#[test]
fn test_listing_is_descending_opposite_of_upcoming() {
    let agenda = Agenda::open_in_memory().unwrap();
    agenda.create_patient(patient("Ana Silva")).unwrap();
    let now = Local::now().naive_local();

    let earlier = agenda
        .create_appointment(appointment_at(1, now + Duration::hours(1), AppointmentStatus::Scheduled))
        .unwrap();
    let later = agenda
        .create_appointment(appointment_at(1, now + Duration::hours(5), AppointmentStatus::Scheduled))
        .unwrap();

    let upcoming = agenda.list_upcoming_appointments(DEFAULT_UPCOMING_LIMIT).unwrap();
    let upcoming_ids: Vec<i64> = upcoming.iter().map(|a| a.id).collect();
    assert_eq!(upcoming_ids, vec![earlier.id, later.id]);

    let listing = agenda.schedule_listing(&ScheduleFilter::default()).unwrap();
    let listing_ids: Vec<i64> = listing.iter().map(|e| e.appointment.id).collect();
    assert_eq!(listing_ids, vec![later.id, earlier.id]);
}

#[test]
fn test_listing_filters_by_date_and_specialty() {
    let agenda = Agenda::open_in_memory().unwrap();
    agenda.create_patient(patient("Ana Silva")).unwrap();

    let base = NewAppointment {
        patient_id: 1,
        date: "2024-06-01".into(),
        time: "09:00".into(),
        specialty: "Clínico Geral".into(),
        status: AppointmentStatus::Scheduled,
        notes: None,
    };
    let wanted = agenda.create_appointment(base.clone()).unwrap();
    agenda
        .create_appointment(NewAppointment {
            specialty: "Ortopedista".into(),
            ..base.clone()
        })
        .unwrap();
    agenda
        .create_appointment(NewAppointment {
            date: "2024-06-02".into(),
            ..base
        })
        .unwrap();

    let filter = ScheduleFilter {
        date: Some("2024-06-01".into()),
        specialty: Some("Clínico Geral".into()),
    };
    let listing = agenda.schedule_listing(&filter).unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].appointment.id, wanted.id);
}

#[test]
fn test_dashboard_stats_counts() {
    let agenda = Agenda::open_in_memory().unwrap();
    agenda.create_patient(patient("Ana Silva")).unwrap();
    agenda.create_patient(patient("Bruno")).unwrap();
    let now = Local::now().naive_local();

    // Today, inside the week window, and far in the past
    agenda
        .create_appointment(appointment_at(1, now, AppointmentStatus::Scheduled))
        .unwrap();
    agenda
        .create_appointment(appointment_at(1, now + Duration::days(3), AppointmentStatus::Scheduled))
        .unwrap();
    agenda
        .create_appointment(appointment_at(2, now - Duration::days(30), AppointmentStatus::Completed))
        .unwrap();

    let stats = agenda.dashboard_stats().unwrap();
    assert_eq!(stats.total_patients, 2);
    assert_eq!(stats.today_appointments, 1);
    assert_eq!(stats.week_appointments, 2);
    assert_eq!(stats.total_appointments, 3);
}

#[test]
fn test_appointment_patch_cannot_change_identity() {
    let agenda = Agenda::open_in_memory().unwrap();
    agenda.create_patient(patient("Ana Silva")).unwrap();
    let now = Local::now().naive_local();

    let created = agenda
        .create_appointment(appointment_at(1, now + Duration::hours(1), AppointmentStatus::Scheduled))
        .unwrap();

    // The patch type carries no id or created_at, so a full patch still
    // leaves identity untouched.
    let updated = agenda
        .update_appointment(
            created.id,
            agenda_core::AppointmentUpdate {
                patient_id: Some(7),
                date: Some("2030-01-01".into()),
                time: Some("08:00".into()),
                specialty: Some("Psiquiatra".into()),
                status: Some(AppointmentStatus::Confirmed),
                notes: Some("rebooked".into()),
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.patient_id, 7);
    assert_eq!(updated.date, "2030-01-01");
}
