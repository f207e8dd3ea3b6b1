//! Doctor-side workflows: patient registration, prescriptions, appointments.
//!
//! All validation happens here, before anything is dispatched; the store only
//! ever sees well-formed records.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AppState, Appointment, Medicine, MedicineTrack, User};
use crate::store::{Action, Outcome, Rejection, Store};

pub const DEFAULT_APPOINTMENT_TITLE: &str = "Follow-up Consultation";

static TIMING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PracticeError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("This Patient ID is already taken. Please use a different one.")]
    PatientIdTaken(String),

    #[error("Could not find a free Patient ID, please enter one")]
    NoFreePatientId,

    #[error("Unknown patient: {0}")]
    UnknownPatient(String),

    #[error("Unknown prescription track: {0}")]
    UnknownTrack(String),

    #[error("Invalid timing {0:?}, expected HH:MM")]
    InvalidTiming(String),

    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),

    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("Completion rate must be between 0 and 100, got {0}")]
    InvalidCompletionRate(f64),

    #[error(transparent)]
    Rejected(#[from] Rejection),
}

// ─── Patients ────────────────────────────────────────────────────────────────

/// Patient row in a doctor's patient list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub is_registered: bool,
    pub age: Option<u32>,
    pub active_tracks: usize,
}

/// Random ids tried before asking for an explicit one.
const PATIENT_ID_ATTEMPTS: usize = 64;

/// `PAT` followed by six random digits.
pub fn generate_patient_id() -> String {
    format!("PAT{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

/// Create a patient shell under `doctor_id`. The patient completes it at signup.
pub fn register_patient(
    store: &mut Store,
    doctor_id: &str,
    name: &str,
    patient_id: Option<&str>,
) -> Result<User, PracticeError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PracticeError::MissingField("Patient name"));
    }

    let id = match patient_id.map(str::trim) {
        Some("") => return Err(PracticeError::MissingField("Patient ID")),
        Some(id) => id.to_string(),
        None => unused_patient_id(
            store.state(),
            std::iter::repeat_with(generate_patient_id).take(PATIENT_ID_ATTEMPTS),
        )?,
    };
    if store.state().users.iter().any(|u| u.id == id) {
        return Err(PracticeError::PatientIdTaken(id));
    }

    let patient = User::patient_shell(&id, name, doctor_id);
    if let Outcome::Rejected(reason) = store.dispatch(Action::AddPatient {
        patient: patient.clone(),
        doctor_id: doctor_id.to_string(),
    }) {
        return Err(reason.into());
    }
    tracing::info!(patient_id = %id, doctor_id = %doctor_id, "Patient registered");
    Ok(patient)
}

fn unused_patient_id(
    state: &AppState,
    candidates: impl IntoIterator<Item = String>,
) -> Result<String, PracticeError> {
    candidates
        .into_iter()
        .find(|id| state.find_user(id).is_none())
        .ok_or(PracticeError::NoFreePatientId)
}

/// The doctor's patients, optionally filtered by a case-insensitive
/// substring of name or id.
pub fn list_patients(state: &AppState, doctor_id: &str, search: Option<&str>) -> Vec<PatientSummary> {
    let Some(doctor) = state.find_doctor(doctor_id) else {
        return Vec::new();
    };
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();

    state
        .users
        .iter()
        .filter(|u| doctor.patients.contains(&u.id))
        .filter(|u| {
            needle.is_empty()
                || u.name.to_lowercase().contains(&needle)
                || u.id.to_lowercase().contains(&needle)
        })
        .map(|u| PatientSummary {
            id: u.id.clone(),
            name: u.name.clone(),
            is_registered: u.is_profile_complete,
            age: u.age,
            active_tracks: state.tracks_for_patient(&u.id).filter(|t| t.is_active).count(),
        })
        .collect()
}

// ─── Prescriptions ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicineInput {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    #[serde(default)]
    pub timings: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInput {
    pub patient_id: String,
    pub condition: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub medicines: Vec<MedicineInput>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Validate and dispatch a new prescription track. Blank timings are dropped.
pub fn create_track(
    store: &mut Store,
    doctor_id: &str,
    input: TrackInput,
) -> Result<MedicineTrack, PracticeError> {
    let patient_id = input.patient_id.trim();
    if patient_id.is_empty() {
        return Err(PracticeError::MissingField("Patient"));
    }
    if store.state().find_user(patient_id).is_none() {
        return Err(PracticeError::UnknownPatient(patient_id.to_string()));
    }
    let condition = input.condition.trim();
    if condition.is_empty() {
        return Err(PracticeError::MissingField("Condition"));
    }
    if input.medicines.is_empty() {
        return Err(PracticeError::MissingField("Medicine"));
    }
    if let Some(end) = input.end_date {
        if end < input.start_date {
            return Err(PracticeError::EndBeforeStart {
                start: input.start_date,
                end,
            });
        }
    }

    let medicines = input
        .medicines
        .into_iter()
        .map(build_medicine)
        .collect::<Result<Vec<_>, _>>()?;

    let track = MedicineTrack {
        id: Uuid::new_v4().to_string(),
        patient_id: patient_id.to_string(),
        condition: condition.to_string(),
        medicines,
        start_date: midnight_utc(input.start_date),
        end_date: input.end_date.map(midnight_utc),
        is_active: true,
        completion_rate: 0.0,
        assigned_by: Some(doctor_id.to_string()),
        notes: input.notes.filter(|n| !n.trim().is_empty()),
    };

    store.dispatch(Action::AddTrack(track.clone()));
    tracing::info!(
        track_id = %track.id,
        patient_id = %track.patient_id,
        medicines = track.medicines.len(),
        "Prescription track created"
    );
    Ok(track)
}

fn build_medicine(input: MedicineInput) -> Result<Medicine, PracticeError> {
    let name = input.name.trim();
    let dosage = input.dosage.trim();
    let frequency = input.frequency.trim();
    if name.is_empty() {
        return Err(PracticeError::MissingField("Medicine name"));
    }
    if dosage.is_empty() {
        return Err(PracticeError::MissingField("Dosage"));
    }
    if frequency.is_empty() {
        return Err(PracticeError::MissingField("Frequency"));
    }

    let mut timings = Vec::new();
    for timing in input.timings {
        let timing = timing.trim();
        if timing.is_empty() {
            continue;
        }
        if !TIMING.is_match(timing) {
            return Err(PracticeError::InvalidTiming(timing.to_string()));
        }
        timings.push(timing.to_string());
    }

    Ok(Medicine {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        dosage: dosage.to_string(),
        frequency: frequency.to_string(),
        timings,
        instructions: input.instructions.filter(|i| !i.trim().is_empty()),
    })
}

/// Date-only inputs denote midnight UTC of that day.
fn midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Change a track's active flag and/or completion rate.
pub fn update_track(
    store: &mut Store,
    track_id: &str,
    is_active: Option<bool>,
    completion_rate: Option<f64>,
) -> Result<MedicineTrack, PracticeError> {
    let mut track = store
        .state()
        .find_track(track_id)
        .cloned()
        .ok_or_else(|| PracticeError::UnknownTrack(track_id.to_string()))?;

    if let Some(rate) = completion_rate {
        if !(0.0..=100.0).contains(&rate) {
            return Err(PracticeError::InvalidCompletionRate(rate));
        }
        track.completion_rate = rate;
    }
    if let Some(active) = is_active {
        track.is_active = active;
    }

    store.dispatch(Action::UpdateTrack(track.clone()));
    tracing::info!(track_id = %track.id, is_active = track.is_active, "Track updated");
    Ok(track)
}

pub fn delete_track(store: &mut Store, track_id: &str) -> Result<(), PracticeError> {
    if store.state().find_track(track_id).is_none() {
        return Err(PracticeError::UnknownTrack(track_id.to_string()));
    }
    store.dispatch(Action::DeleteTrack(track_id.to_string()));
    tracing::info!(track_id = %track_id, "Track deleted");
    Ok(())
}

// ─── Appointments ────────────────────────────────────────────────────────────

/// Schedule an appointment at a local date ("YYYY-MM-DD") and time ("HH:MM").
pub fn schedule_appointment(
    store: &mut Store,
    doctor_id: &str,
    patient_id: &str,
    title: &str,
    date: &str,
    time: &str,
    notes: Option<&str>,
) -> Result<Appointment, PracticeError> {
    let patient_id = patient_id.trim();
    let title = title.trim();
    if patient_id.is_empty() {
        return Err(PracticeError::MissingField("Patient"));
    }
    if title.is_empty() {
        return Err(PracticeError::MissingField("Title"));
    }
    if date.trim().is_empty() {
        return Err(PracticeError::MissingField("Date"));
    }
    if time.trim().is_empty() {
        return Err(PracticeError::MissingField("Time"));
    }

    let when = local_datetime(date.trim(), time.trim())?;
    let appointment = Appointment {
        id: Uuid::new_v4().to_string(),
        patient_id: patient_id.to_string(),
        doctor_id: doctor_id.to_string(),
        title: title.to_string(),
        date: when,
        notes: notes.map(str::trim).filter(|n| !n.is_empty()).map(String::from),
    };

    store.dispatch(Action::AddAppointment(appointment.clone()));
    tracing::info!(
        appointment_id = %appointment.id,
        patient_id = %patient_id,
        "Appointment scheduled"
    );
    Ok(appointment)
}

/// Combine a local calendar date and wall-clock time into a point in time.
pub fn local_datetime(date: &str, time: &str) -> Result<DateTime<Utc>, PracticeError> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| PracticeError::InvalidDate(date.to_string()))?;
    let clock = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| PracticeError::InvalidTime(time.to_string()))?;

    Local
        .from_local_datetime(&day.and_time(clock))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| PracticeError::InvalidTime(time.to_string()))
}

/// Appointments for a user: a patient's own, or every one a doctor booked.
pub fn appointments_for(state: &AppState, user: &User) -> Vec<Appointment> {
    let mut list: Vec<_> = state
        .appointments
        .iter()
        .filter(|a| {
            if user.is_doctor() {
                a.doctor_id == user.id
            } else {
                a.patient_id == user.id
            }
        })
        .cloned()
        .collect();
    list.sort_by_key(|a| a.date);
    list
}
