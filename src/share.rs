//! Read-only share links for a patient's tracks and progress.
//!
//! A link is identified by a random id and guarded by a six-character access
//! code that the patient passes on separately.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{self, AuthError};
use crate::models::{AppState, MedicineTrack, ShareableLink, SharedSections};
use crate::store::{Action, Store};

pub const ACCESS_CODE_LEN: usize = 6;
const ACCESS_CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Select at least one section to share")]
    NothingShared,

    #[error("This shareable link is invalid or has expired.")]
    UnknownLink,

    #[error("This shareable link is invalid or has expired.")]
    Expired,

    #[error("Invalid access code")]
    InvalidCode,

    #[error("Link lifetime is too long")]
    LifetimeTooLong,
}

pub fn generate_access_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ACCESS_CODE_LEN)
        .map(|_| char::from(ACCESS_CODE_CHARS[rng.gen_range(0..ACCESS_CODE_CHARS.len())]))
        .collect()
}

/// Create a link to the signed-in patient's data.
pub fn create_link(
    store: &mut Store,
    sections: SharedSections,
    valid_for: Option<TimeDelta>,
    now: DateTime<Utc>,
) -> Result<ShareableLink, ShareError> {
    let user = auth::require_patient(store.state())?;
    if !sections.tracks && !sections.progress {
        return Err(ShareError::NothingShared);
    }
    let expires_at = match valid_for {
        Some(d) => Some(now.checked_add_signed(d).ok_or(ShareError::LifetimeTooLong)?),
        None => None,
    };

    let link = ShareableLink {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        access_code: generate_access_code(),
        shared_data: sections,
        created_at: now,
        expires_at,
    };
    store.dispatch(Action::AddShareLink(link.clone()));
    tracing::info!(link_id = %link.id, patient_id = %link.user_id, "Share link created");
    Ok(link)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareProgress {
    pub active_tracks: usize,
    pub total_medicines: usize,
    /// Rounded mean completion rate, 0 without tracks.
    pub average_completion: u32,
    pub doses_taken: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareView {
    pub patient_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<MedicineTrack>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ShareProgress>,
}

/// Open a link with its access code. The code is not case-sensitive.
pub fn open_link(
    state: &AppState,
    link_id: &str,
    access_code: &str,
    now: DateTime<Utc>,
) -> Result<ShareView, ShareError> {
    let link = state
        .shareable_links
        .iter()
        .find(|l| l.id == link_id.trim())
        .ok_or(ShareError::UnknownLink)?;
    if link.is_expired(now) {
        return Err(ShareError::Expired);
    }
    if !access_code.trim().eq_ignore_ascii_case(&link.access_code) {
        tracing::warn!(link_id = %link.id, "Share link opened with wrong access code");
        return Err(ShareError::InvalidCode);
    }

    let tracks: Vec<MedicineTrack> = state.tracks_for_patient(&link.user_id).cloned().collect();
    let progress = link.shared_data.progress.then(|| summarize_progress(state, &tracks));
    let patient_name = state
        .find_user(&link.user_id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| format!("Patient ID: {}", link.user_id));

    tracing::info!(link_id = %link.id, "Share link opened");
    Ok(ShareView {
        patient_name,
        tracks: link.shared_data.tracks.then_some(tracks),
        progress,
    })
}

fn summarize_progress(state: &AppState, tracks: &[MedicineTrack]) -> ShareProgress {
    let average_completion = if tracks.is_empty() {
        0
    } else {
        let mean = tracks.iter().map(|t| t.completion_rate).sum::<f64>() / tracks.len() as f64;
        mean.round().clamp(0.0, f64::from(u32::MAX)) as u32
    };
    ShareProgress {
        active_tracks: tracks.iter().filter(|t| t.is_active).count(),
        total_medicines: tracks.iter().map(|t| t.medicines.len()).sum(),
        average_completion,
        doses_taken: state
            .daily_logs
            .iter()
            .filter(|l| l.taken && tracks.iter().any(|t| t.id == l.track_id))
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::models::{DailyLog, User};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    fn track(id: &str, patient: &str, active: bool, rate: f64) -> MedicineTrack {
        MedicineTrack {
            id: id.into(),
            patient_id: patient.into(),
            condition: "Asthma".into(),
            medicines: vec![],
            start_date: now(),
            end_date: None,
            is_active: active,
            completion_rate: rate,
            assigned_by: None,
            notes: None,
        }
    }

    fn signed_in() -> Store {
        let mut store = Store::in_memory();
        let mut user = User::patient_shell("PAT1", "Asha", "doc_1");
        user.is_profile_complete = true;
        store.dispatch(Action::AddPatient {
            patient: user.clone(),
            doctor_id: "doc_1".into(),
        });
        store.dispatch(Action::Login(user));
        store.dispatch(Action::AddTrack(track("t1", "PAT1", true, 80.0)));
        store.dispatch(Action::AddTrack(track("t2", "PAT1", false, 45.0)));
        store.dispatch(Action::AddTrack(track("t3", "PAT2", true, 10.0)));
        store
    }

    #[test]
    fn access_code_shape() {
        let code = generate_access_code();
        assert_eq!(code.len(), ACCESS_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn open_with_lowercase_code() {
        let mut store = signed_in();
        store.dispatch(Action::LogMedicine(DailyLog {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            medicine_id: "m1".into(),
            track_id: "t1".into(),
            timing: "08:00".into(),
            taken: true,
            taken_at: None,
        }));
        let link = create_link(&mut store, SharedSections::default(), None, now()).unwrap();

        let view = open_link(store.state(), &link.id, &link.access_code.to_lowercase(), now()).unwrap();
        assert_eq!(view.patient_name, "Asha");
        assert_eq!(view.tracks.as_ref().map(Vec::len), Some(2));
        let progress = view.progress.unwrap();
        assert_eq!(progress.active_tracks, 1);
        assert_eq!(progress.average_completion, 63);
        assert_eq!(progress.doses_taken, 1);
    }

    #[test]
    fn wrong_code_and_unknown_link() {
        let mut store = signed_in();
        let link = create_link(&mut store, SharedSections::default(), None, now()).unwrap();
        let wrong = if link.access_code == "AAAAAA" { "BBBBBB" } else { "AAAAAA" };

        assert!(matches!(
            open_link(store.state(), &link.id, wrong, now()),
            Err(ShareError::InvalidCode)
        ));
        assert!(matches!(
            open_link(store.state(), "nope", &link.access_code, now()),
            Err(ShareError::UnknownLink)
        ));
    }

    #[test]
    fn sections_limit_the_view() {
        let mut store = signed_in();
        let sections = SharedSections {
            tracks: false,
            progress: true,
        };
        let link = create_link(&mut store, sections, None, now()).unwrap();
        let view = open_link(store.state(), &link.id, &link.access_code, now()).unwrap();
        assert!(view.tracks.is_none());
        assert!(view.progress.is_some());

        let none = SharedSections {
            tracks: false,
            progress: false,
        };
        assert!(matches!(
            create_link(&mut store, none, None, now()),
            Err(ShareError::NothingShared)
        ));
    }

    #[test]
    fn expired_link_is_refused() {
        let mut store = signed_in();
        let link = create_link(&mut store, SharedSections::default(), Some(TimeDelta::hours(1)), now()).unwrap();
        assert!(open_link(store.state(), &link.id, &link.access_code, now()).is_ok());
        assert!(matches!(
            open_link(store.state(), &link.id, &link.access_code, now() + TimeDelta::hours(2)),
            Err(ShareError::Expired)
        ));
    }

    #[test]
    fn lifetime_past_the_calendar_is_refused() {
        let mut store = signed_in();
        let far = TimeDelta::try_hours(1_000_000_000_000).unwrap();
        assert!(matches!(
            create_link(&mut store, SharedSections::default(), Some(far), now()),
            Err(ShareError::LifetimeTooLong)
        ));
        assert!(store.state().shareable_links.is_empty());
    }

    #[test]
    fn doctors_cannot_create_links() {
        let mut store = Store::in_memory();
        crate::auth::login_doctor(&mut store, "Ben Adams", "ben.adams@clinic.com", now()).unwrap();
        assert!(matches!(
            create_link(&mut store, SharedSections::default(), None, now()),
            Err(ShareError::Auth(AuthError::WrongRole(_)))
        ));
    }
}
