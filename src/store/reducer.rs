//! Pure state transitions.
//!
//! `reduce` is total: every action yields a state. Uniqueness violations
//! leave the state untouched and are reported through [`Outcome::Rejected`].

use serde::Serialize;

use crate::models::AppState;

use super::Action;

/// What a dispatch did to the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    /// Action had no effect (unknown tag).
    Unchanged,
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("A user with ID {0} already exists")]
    DuplicateUserId(String),
    #[error("A doctor with email {0} already exists")]
    DuplicateDoctorEmail(String),
}

pub fn reduce(mut state: AppState, action: Action) -> (AppState, Outcome) {
    match action {
        Action::Login(user) => {
            state.user = Some(user);
            state.is_authenticated = true;
        }
        Action::Logout => {
            state.user = None;
            state.is_authenticated = false;
            state.show_daily_check_in = true;
        }
        Action::AddPatient { patient, doctor_id } => {
            if state.users.iter().any(|u| u.id == patient.id) {
                return (state, Outcome::Rejected(Rejection::DuplicateUserId(patient.id)));
            }
            match state.doctors.iter_mut().find(|d| d.id == doctor_id) {
                Some(doctor) => doctor.patients.push(patient.id.clone()),
                None => tracing::warn!(
                    doctor_id = %doctor_id,
                    patient_id = %patient.id,
                    "Patient added for unknown doctor"
                ),
            }
            state.users.push(patient);
        }
        Action::UpdateUser(user) => {
            if let Some(existing) = state.users.iter_mut().find(|u| u.id == user.id) {
                *existing = user.clone();
            }
            if state.user.as_ref().is_some_and(|u| u.id == user.id) {
                state.user = Some(user);
            }
        }
        Action::AddTrack(track) => state.tracks.push(track),
        Action::UpdateTrack(track) => {
            if let Some(existing) = state.tracks.iter_mut().find(|t| t.id == track.id) {
                *existing = track;
            }
        }
        Action::DeleteTrack(id) => state.tracks.retain(|t| t.id != id),
        Action::LogMedicine(log) => {
            state.daily_logs.retain(|l| l.key() != log.key());
            state.daily_logs.push(log);
        }
        Action::AddDoctor(doctor) => {
            if state.doctors.iter().any(|d| d.email == doctor.email) {
                return (
                    state,
                    Outcome::Rejected(Rejection::DuplicateDoctorEmail(doctor.email)),
                );
            }
            state.doctors.push(doctor);
        }
        Action::AddAppointment(appointment) => state.appointments.push(appointment),
        Action::AddCheckIn(check_in) => state.daily_check_ins.push(check_in),
        Action::AddChatMessage(message) => {
            match state.chat_history.iter_mut().find(|m| m.id == message.id) {
                Some(existing) => *existing = message,
                None => state.chat_history.push(message),
            }
        }
        Action::AddShareLink(link) => state.shareable_links.push(link),
        Action::ToggleTheme => state.theme = state.theme.toggled(),
        Action::SetLanguage(language) => state.language = language,
        Action::SetShowDailyCheckIn(show) => state.show_daily_check_in = show,
        Action::LoadData(patch) => state.merge(patch),
        Action::Unknown => return (state, Outcome::Unchanged),
    }
    (state, Outcome::Applied)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::models::{ChatMessage, DailyLog, Doctor, Medicine, MedicineTrack, Theme, User};

    fn apply(state: AppState, action: Action) -> AppState {
        reduce(state, action).0
    }

    fn add_patient(id: &str, doctor: &str) -> Action {
        Action::AddPatient {
            patient: User::patient_shell(id, "A", doctor),
            doctor_id: doctor.into(),
        }
    }

    fn track(id: &str, patient: &str) -> MedicineTrack {
        MedicineTrack {
            id: id.into(),
            patient_id: patient.into(),
            condition: "Hypertension".into(),
            medicines: vec![Medicine {
                id: "m1".into(),
                name: "Amlodipine".into(),
                dosage: "5mg".into(),
                frequency: "Twice daily".into(),
                timings: vec!["08:00".into(), "20:00".into()],
                instructions: None,
            }],
            start_date: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
            end_date: None,
            is_active: true,
            completion_rate: 0.0,
            assigned_by: Some("doc_1".into()),
            notes: None,
        }
    }

    fn log(timing: &str, taken: bool) -> DailyLog {
        DailyLog {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            medicine_id: "m1".into(),
            track_id: "t1".into(),
            timing: timing.into(),
            taken,
            taken_at: None,
        }
    }

    #[test]
    fn login_sets_session() {
        let user = User::patient_shell("PAT1", "A", "doc_1");
        let (state, outcome) = reduce(AppState::default(), Action::Login(user.clone()));
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(state.user, Some(user));
        assert!(state.is_authenticated);
    }

    #[test]
    fn logout_clears_session_only() {
        let mut state = apply(AppState::default(), add_patient("PAT1", "doc_1"));
        state = apply(state, Action::Login(User::patient_shell("PAT1", "A", "doc_1")));
        state = apply(state, Action::SetShowDailyCheckIn(false));
        state = apply(state, Action::Logout);

        assert!(state.user.is_none());
        assert!(!state.is_authenticated);
        assert!(state.show_daily_check_in);
        assert_eq!(state.users.len(), 1);
    }

    #[test]
    fn add_patient_links_doctor() {
        let state = apply(AppState::default(), add_patient("PAT1", "doc_1"));
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.find_doctor("doc_1").unwrap().patients, vec!["PAT1"]);
        assert!(state.find_doctor("doc_2").unwrap().patients.is_empty());
    }

    #[test]
    fn duplicate_patient_is_rejected_without_change() {
        let state = apply(AppState::default(), add_patient("PAT1", "doc_1"));
        let (after, outcome) = reduce(state.clone(), add_patient("PAT1", "doc_2"));
        assert_eq!(
            outcome,
            Outcome::Rejected(Rejection::DuplicateUserId("PAT1".into()))
        );
        assert_eq!(after, state);
    }

    #[test]
    fn patient_for_unknown_doctor_is_still_added() {
        let (state, outcome) = reduce(AppState::default(), add_patient("PAT1", "doc_404"));
        assert!(outcome.is_applied());
        assert_eq!(state.users.len(), 1);
        assert!(state.doctors.iter().all(|d| d.patients.is_empty()));
    }

    #[test]
    fn update_user_refreshes_session_copy() {
        let mut state = apply(AppState::default(), add_patient("PAT1", "doc_1"));
        state = apply(state, Action::Login(User::patient_shell("PAT1", "A", "doc_1")));

        let mut updated = User::patient_shell("PAT1", "Asha", "doc_1");
        updated.is_profile_complete = true;
        state = apply(state, Action::UpdateUser(updated.clone()));

        assert_eq!(state.users[0], updated);
        assert_eq!(state.user, Some(updated));
    }

    #[test]
    fn update_user_leaves_other_session_alone() {
        let mut state = apply(AppState::default(), add_patient("PAT1", "doc_1"));
        state = apply(state, add_patient("PAT2", "doc_1"));
        let session = User::patient_shell("PAT2", "B", "doc_1");
        state = apply(state, Action::Login(session.clone()));
        state = apply(state, Action::UpdateUser(User::patient_shell("PAT1", "Z", "doc_1")));
        assert_eq!(state.user, Some(session));
        assert_eq!(state.users[0].name, "Z");
    }

    #[test]
    fn track_lifecycle() {
        let mut state = apply(AppState::default(), Action::AddTrack(track("t1", "PAT1")));
        let mut changed = track("t1", "PAT1");
        changed.completion_rate = 80.0;
        state = apply(state, Action::UpdateTrack(changed));
        assert_eq!(state.tracks[0].completion_rate, 80.0);

        state = apply(state, Action::DeleteTrack("t1".into()));
        assert!(state.tracks.is_empty());
    }

    #[test]
    fn log_medicine_upserts_by_key() {
        let mut state = AppState::default();
        state = apply(state, Action::LogMedicine(log("08:00", true)));
        state = apply(state, Action::LogMedicine(log("20:00", true)));
        state = apply(state, Action::LogMedicine(log("08:00", false)));

        assert_eq!(state.daily_logs.len(), 2);
        let morning: Vec<_> = state.daily_logs.iter().filter(|l| l.timing == "08:00").collect();
        assert_eq!(morning.len(), 1);
        assert!(!morning[0].taken);
    }

    #[test]
    fn duplicate_doctor_email_is_rejected() {
        let doctor = Doctor {
            id: "doc_9".into(),
            name: "Someone".into(),
            email: "emily.carter@clinic.com".into(),
            specialization: "General Medicine".into(),
            patients: vec![],
            license_number: "DEMO-1".into(),
        };
        let (state, outcome) = reduce(AppState::default(), Action::AddDoctor(doctor));
        assert!(matches!(
            outcome,
            Outcome::Rejected(Rejection::DuplicateDoctorEmail(_))
        ));
        assert_eq!(state.doctors.len(), 2);
    }

    #[test]
    fn chat_message_replaced_in_place() {
        let now = Utc::now();
        let first = ChatMessage::pending("PAT1", "one", now);
        let second = ChatMessage::pending("PAT1", "two", now);
        let mut state = apply(AppState::default(), Action::AddChatMessage(first.clone()));
        state = apply(state, Action::AddChatMessage(second));

        let done = first.completed("reply".into(), false);
        state = apply(state, Action::AddChatMessage(done.clone()));
        assert_eq!(state.chat_history.len(), 2);
        assert_eq!(state.chat_history[0], done);
    }

    #[test]
    fn preferences() {
        let mut state = apply(AppState::default(), Action::ToggleTheme);
        assert_eq!(state.theme, Theme::Dark);
        state = apply(state, Action::ToggleTheme);
        assert_eq!(state.theme, Theme::Light);
        state = apply(state, Action::SetLanguage("hi".into()));
        assert_eq!(state.language, "hi");
    }

    #[test]
    fn unknown_is_noop() {
        let (state, outcome) = reduce(AppState::default(), Action::Unknown);
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn load_data_merges_shallowly() {
        let mut state = apply(AppState::default(), add_patient("PAT1", "doc_1"));
        let patch = serde_json::from_str(r#"{"language":"hi","tracks":[]}"#).unwrap();
        state = apply(state, Action::LoadData(patch));
        assert_eq!(state.language, "hi");
        assert_eq!(state.users.len(), 1);
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        fn arb_action() -> impl Strategy<Value = Action> {
            prop_oneof![
                (0u8..5).prop_map(|n| add_patient(&format!("PAT{n}"), "doc_1")),
                (0u8..3).prop_map(|n| Action::AddTrack(track(&format!("t{n}"), "PAT0"))),
                (0u8..3).prop_map(|n| Action::DeleteTrack(format!("t{n}"))),
                (prop_oneof![Just("08:00"), Just("20:00")], any::<bool>())
                    .prop_map(|(timing, taken)| Action::LogMedicine(log(timing, taken))),
                Just(Action::ToggleTheme),
                any::<bool>().prop_map(Action::SetShowDailyCheckIn),
                Just(Action::Logout),
            ]
        }

        proptest! {
            #[test]
            fn logout_preserves_domain_data(actions in proptest::collection::vec(arb_action(), 0..30)) {
                let mut state = AppState::default();
                for action in actions {
                    state = apply(state, action);
                }
                let before = state.clone();
                let after = apply(state, Action::Logout);

                prop_assert!(after.user.is_none());
                prop_assert!(!after.is_authenticated);
                prop_assert!(after.show_daily_check_in);
                prop_assert_eq!(&after.users, &before.users);
                prop_assert_eq!(&after.tracks, &before.tracks);
                prop_assert_eq!(&after.daily_logs, &before.daily_logs);
                prop_assert_eq!(&after.doctors, &before.doctors);
                prop_assert_eq!(after.theme, before.theme);
            }

            #[test]
            fn at_most_one_log_per_key(actions in proptest::collection::vec(arb_action(), 0..40)) {
                let mut state = AppState::default();
                for action in actions {
                    state = apply(state, action);
                }
                for log in &state.daily_logs {
                    let same = state.daily_logs.iter().filter(|l| l.key() == log.key()).count();
                    prop_assert_eq!(same, 1);
                }
            }

            #[test]
            fn last_log_wins(flags in proptest::collection::vec(any::<bool>(), 1..20)) {
                let mut state = AppState::default();
                for taken in &flags {
                    state = apply(state, Action::LogMedicine(log("08:00", *taken)));
                }
                prop_assert_eq!(state.daily_logs.len(), 1);
                prop_assert_eq!(state.daily_logs[0].taken, *flags.last().unwrap());
            }

            #[test]
            fn user_ids_stay_unique(actions in proptest::collection::vec(arb_action(), 0..40)) {
                let mut state = AppState::default();
                for action in actions {
                    state = apply(state, action);
                }
                let mut ids: Vec<_> = state.users.iter().map(|u| u.id.clone()).collect();
                let total = ids.len();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), total);
            }
        }
    }
}
