//! Daily medication checklist, dose logging and adherence summaries.
//!
//! Everything here is a query over the state except `toggle_dose`, which
//! dispatches a `LOG_MEDICINE`. Callers pass the current date and time so the
//! views are reproducible.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::Serialize;

use crate::models::{AppState, ChatMessage, DailyCheckIn, DailyLog, DoseStatus, MedicineTrack, User};
use crate::store::{Action, Store};

/// A dose more than this late is overdue.
pub const OVERDUE_GRACE_MINUTES: i64 = 30;

/// How many red-flag check-ins and chats the doctor dashboard shows.
pub const RECENT_ALERTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdherenceError {
    #[error("No dose of medicine {medicine_id} at {timing} is scheduled for this patient")]
    UnknownDose { medicine_id: String, timing: String },
}

// ═══════════════════════════════════════════
// Today's checklist
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseSlot {
    pub track_id: String,
    pub medicine_id: String,
    pub medicine_name: String,
    pub dosage: String,
    pub timing: String,
    pub condition: String,
    pub taken: bool,
    pub status: DoseStatus,
}

/// One slot per timing of every medicine in the patient's active tracks,
/// sorted by timing.
pub fn todays_doses(state: &AppState, patient_id: &str, today: NaiveDate, now: NaiveTime) -> Vec<DoseSlot> {
    doses_on(state, Some(patient_id), today, today, now)
}

/// Dose slots of active tracks on `day`, for one patient or for everyone.
///
/// Untaken doses on past days are overdue and on future days upcoming; on
/// `today` the status follows the wall clock.
pub fn doses_on(
    state: &AppState,
    patient_id: Option<&str>,
    day: NaiveDate,
    today: NaiveDate,
    now: NaiveTime,
) -> Vec<DoseSlot> {
    let mut slots: Vec<DoseSlot> = state
        .tracks
        .iter()
        .filter(|t| t.is_active && patient_id.map_or(true, |p| t.patient_id == p))
        .flat_map(move |track| {
            track.medicines.iter().flat_map(move |medicine| {
                medicine.timings.iter().map(move |timing| {
                    let taken = is_taken(&state.daily_logs, day, &medicine.id, timing);
                    let status = match day.cmp(&today) {
                        Ordering::Less if !taken => DoseStatus::Overdue,
                        Ordering::Greater if !taken => DoseStatus::Upcoming,
                        _ => dose_status(timing, taken, now),
                    };
                    DoseSlot {
                        track_id: track.id.clone(),
                        medicine_id: medicine.id.clone(),
                        medicine_name: medicine.name.clone(),
                        dosage: medicine.dosage.clone(),
                        timing: timing.clone(),
                        condition: track.condition.clone(),
                        taken,
                        status,
                    }
                })
            })
        })
        .collect();
    slots.sort_by(|a, b| a.timing.cmp(&b.timing));
    slots
}

fn is_taken(logs: &[DailyLog], day: NaiveDate, medicine_id: &str, timing: &str) -> bool {
    logs.iter()
        .any(|l| l.date == day && l.medicine_id == medicine_id && l.timing == timing && l.taken)
}

/// Status of a scheduled dose relative to the current wall-clock time.
pub fn dose_status(timing: &str, taken: bool, now: NaiveTime) -> DoseStatus {
    if taken {
        return DoseStatus::Taken;
    }
    let Ok(scheduled) = NaiveTime::parse_from_str(timing, "%H:%M") else {
        return DoseStatus::Upcoming;
    };
    if now < scheduled {
        DoseStatus::Upcoming
    } else if now - scheduled > TimeDelta::minutes(OVERDUE_GRACE_MINUTES) {
        DoseStatus::Overdue
    } else {
        DoseStatus::Due
    }
}

/// Flip the taken state of one of today's doses.
pub fn toggle_dose(
    store: &mut Store,
    patient_id: &str,
    medicine_id: &str,
    timing: &str,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<DailyLog, AdherenceError> {
    let track_id = store
        .state()
        .tracks_for_patient(patient_id)
        .find(|t| {
            t.medicines
                .iter()
                .any(|m| m.id == medicine_id && m.timings.iter().any(|x| x == timing))
        })
        .map(|t| t.id.clone())
        .ok_or_else(|| AdherenceError::UnknownDose {
            medicine_id: medicine_id.to_string(),
            timing: timing.to_string(),
        })?;

    let was_taken = is_taken(&store.state().daily_logs, today, medicine_id, timing);
    let log = DailyLog {
        date: today,
        medicine_id: medicine_id.to_string(),
        track_id,
        timing: timing.to_string(),
        taken: !was_taken,
        taken_at: (!was_taken).then_some(now),
    };

    store.dispatch(Action::LogMedicine(log.clone()));
    tracing::info!(
        patient_id = %patient_id,
        medicine_id = %medicine_id,
        timing = %timing,
        taken = log.taken,
        "Dose logged"
    );
    Ok(log)
}

// ═══════════════════════════════════════════
// Summaries
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientStats {
    pub active_tracks: usize,
    pub todays_taken: usize,
    pub todays_total: usize,
    /// 0-100; zero when nothing is scheduled.
    pub todays_completion: f64,
    pub total_medicines: usize,
    /// Mean of the tracks' completion rates; zero without tracks.
    pub overall_completion: f64,
}

pub fn patient_stats(state: &AppState, patient_id: &str, today: NaiveDate, now: NaiveTime) -> PatientStats {
    let tracks: Vec<&MedicineTrack> = state.tracks_for_patient(patient_id).collect();
    let doses = todays_doses(state, patient_id, today, now);
    let todays_taken = doses.iter().filter(|d| d.taken).count();
    let todays_total = doses.len();

    PatientStats {
        active_tracks: tracks.iter().filter(|t| t.is_active).count(),
        todays_taken,
        todays_total,
        todays_completion: percentage(todays_taken, todays_total),
        total_medicines: tracks.iter().map(|t| t.medicines.len()).sum(),
        overall_completion: mean_completion(&tracks).unwrap_or(0.0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDashboard {
    pub total_patients: usize,
    pub active_prescriptions: usize,
    /// Newest first.
    pub check_in_alerts: Vec<DailyCheckIn>,
    /// Newest first.
    pub chat_alerts: Vec<ChatMessage>,
    pub recent_alerts: usize,
    /// `None` when the doctor's patients have no tracks.
    pub average_compliance: Option<f64>,
}

pub fn doctor_dashboard(state: &AppState, doctor_id: &str) -> DoctorDashboard {
    let patient_ids: &[String] = state
        .find_doctor(doctor_id)
        .map(|d| d.patients.as_slice())
        .unwrap_or_default();
    let is_mine = |id: &str| patient_ids.iter().any(|p| p == id);

    let check_in_alerts = newest_first(
        state
            .daily_check_ins
            .iter()
            .filter(|c| is_mine(c.user_id.as_str()) && c.has_red_flags())
            .cloned()
            .collect(),
        |c: &DailyCheckIn| c.timestamp,
    );
    let chat_alerts = newest_first(
        state
            .chat_history
            .iter()
            .filter(|m| is_mine(m.user_id.as_str()) && m.is_red_flag())
            .cloned()
            .collect(),
        |m: &ChatMessage| m.timestamp,
    );

    let tracks: Vec<&MedicineTrack> = state.tracks.iter().filter(|t| is_mine(t.patient_id.as_str())).collect();

    DoctorDashboard {
        total_patients: patient_ids.len(),
        active_prescriptions: tracks.iter().filter(|t| t.is_active).count(),
        recent_alerts: check_in_alerts.len() + chat_alerts.len(),
        check_in_alerts,
        chat_alerts,
        average_compliance: mean_completion(&tracks),
    }
}

/// Last `RECENT_ALERTS` entries in insertion order, then sorted newest first.
fn newest_first<T>(mut items: Vec<T>, timestamp: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let skip = items.len().saturating_sub(RECENT_ALERTS);
    items.drain(..skip);
    items.sort_by_key(|item| std::cmp::Reverse(timestamp(item)));
    items
}

fn mean_completion(tracks: &[&MedicineTrack]) -> Option<f64> {
    if tracks.is_empty() {
        return None;
    }
    Some(tracks.iter().map(|t| t.completion_rate).sum::<f64>() / tracks.len() as f64)
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

// ═══════════════════════════════════════════
// Track listing
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackView {
    pub patient_name: String,
    #[serde(flatten)]
    pub track: MedicineTrack,
}

/// Doctors see every track; patients see their own.
pub fn visible_tracks(state: &AppState, user: &User) -> Vec<TrackView> {
    state
        .tracks
        .iter()
        .filter(|t| user.is_doctor() || t.patient_id == user.id)
        .map(|t| TrackView {
            patient_name: state
                .find_user(&t.patient_id)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| format!("Patient ID: {}", t.patient_id)),
            track: t.clone(),
        })
        .collect()
}
