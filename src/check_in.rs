//! Daily mood and symptom check-in for patients.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{self, AuthError};
use crate::models::{AppState, DailyCheckIn};
use crate::safety::{EmergencyAlert, EmergencyNotifier};
use crate::store::{Action, Store};

pub const MOOD_LABELS: [&str; 10] = [
    "😰 Terrible",
    "😞 Poor",
    "😐 Okay",
    "😊 Good",
    "😄 Great",
    "🤗 Amazing",
    "💪 Energetic",
    "😴 Tired",
    "🤒 Unwell",
    "😌 Peaceful",
];

pub const COMMON_SYMPTOMS: &[&str] = &[
    "Fever",
    "Headache",
    "Nausea",
    "Fatigue",
    "Dizziness",
    "Chest pain",
    "Shortness of breath",
    "Stomach pain",
    "Joint pain",
    "Insomnia",
    "Loss of appetite",
    "Cough",
    "Sore throat",
];

pub const DEFAULT_MOOD: u8 = 5;
const MOOD_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

const CARDIOVASCULAR_SYMPTOMS: &[&str] = &["chest pain", "shortness of breath"];

#[derive(Debug, thiserror::Error)]
pub enum CheckInError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Mood must be between 1 and 10, got {0}")]
    MoodOutOfRange(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInForm {
    pub mood: u8,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl Default for CheckInForm {
    fn default() -> Self {
        Self {
            mood: DEFAULT_MOOD,
            symptoms: Vec::new(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInReceipt {
    pub check_in: DailyCheckIn,
    /// Acknowledgment of the emergency alert, when one went out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
}

/// Choices offered on the check-in form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInOptions {
    pub default_mood: u8,
    pub mood_labels: &'static [&'static str],
    pub common_symptoms: &'static [&'static str],
}

pub fn options() -> CheckInOptions {
    CheckInOptions {
        default_mood: DEFAULT_MOOD,
        mood_labels: &MOOD_LABELS,
        common_symptoms: COMMON_SYMPTOMS,
    }
}

/// Label for a mood score, if it is in range.
pub fn mood_label(mood: u8) -> Option<&'static str> {
    MOOD_RANGE
        .contains(&mood)
        .then(|| MOOD_LABELS[usize::from(mood) - 1])
}

/// Whether the signed-in patient should be asked to check in today.
pub fn should_prompt(state: &AppState, today: NaiveDate) -> bool {
    let Ok(user) = auth::require_patient(state) else {
        return false;
    };
    state.show_daily_check_in && !state.check_ins_for_user(&user.id).any(|c| c.date == today)
}

/// Dismiss the check-in prompt for the rest of the session.
pub fn skip(store: &mut Store) {
    store.dispatch(Action::SetShowDailyCheckIn(false));
    tracing::info!("Daily check-in skipped");
}

/// Red flags raised by a check-in.
pub fn detect_red_flags(symptoms: &[String], notes: &str, mood: u8) -> Vec<String> {
    let mut flags = Vec::new();
    let all_text = symptoms
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(notes))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if symptoms
        .iter()
        .any(|s| CARDIOVASCULAR_SYMPTOMS.contains(&s.to_lowercase().as_str()))
    {
        flags.push("Cardiovascular symptoms".to_string());
    }
    if all_text.contains("severe") || all_text.contains("unbearable") {
        flags.push("Severe symptoms".to_string());
    }
    if all_text.contains("suicidal") || all_text.contains("self-harm") {
        flags.push("Mental health crisis".to_string());
    }
    if mood <= 2 {
        flags.push("Very low mood".to_string());
    }
    flags
}

/// Record today's check-in for the signed-in patient.
///
/// When red flags are raised and the patient has an emergency contact, the
/// contact is notified. A failed notification is logged and does not undo the
/// check-in.
pub fn submit(
    store: &mut Store,
    notifier: &dyn EmergencyNotifier,
    form: CheckInForm,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<CheckInReceipt, CheckInError> {
    let user = auth::require_patient(store.state())?.clone();
    if !MOOD_RANGE.contains(&form.mood) {
        return Err(CheckInError::MoodOutOfRange(form.mood));
    }

    let symptoms = normalize_symptoms(form.symptoms);
    let red_flags = detect_red_flags(&symptoms, &form.notes, form.mood);
    let check_in = DailyCheckIn {
        id: now.timestamp_millis().to_string(),
        user_id: user.id.clone(),
        date: today,
        mood: form.mood,
        symptoms,
        notes: form.notes,
        red_flags,
        timestamp: now,
    };
    store.dispatch(Action::AddCheckIn(check_in.clone()));
    tracing::info!(
        patient_id = %user.id,
        mood = check_in.mood,
        red_flags = check_in.red_flags.len(),
        "Check-in recorded"
    );

    let alert = match user.emergency_contact() {
        Some(contact) if check_in.has_red_flags() => {
            let alert = EmergencyAlert {
                contact,
                patient_name: user.name.clone(),
                symptoms: check_in.red_flags.clone(),
            };
            match notifier.notify(&alert) {
                Ok(ack) => Some(ack),
                Err(e) => {
                    tracing::warn!(error = %e, patient_id = %user.id, "Emergency alert not sent");
                    None
                }
            }
        }
        _ => None,
    };

    Ok(CheckInReceipt { check_in, alert })
}

/// Trimmed, non-blank, first occurrence of each symptom.
fn normalize_symptoms(symptoms: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(symptoms.len());
    for s in symptoms {
        let s = s.trim();
        if !s.is_empty() && !out.iter().any(|o| o == s) {
            out.push(s.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::User;
    use crate::safety::RecordingNotifier;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    fn signed_in(contact: Option<&str>) -> Store {
        let mut store = Store::in_memory();
        let mut user = User::patient_shell("PAT1", "Asha", "doc_1");
        user.is_profile_complete = true;
        user.emergency_contact = contact.map(String::from);
        store.dispatch(Action::AddPatient {
            patient: user.clone(),
            doctor_id: "doc_1".into(),
        });
        store.dispatch(Action::Login(user));
        store
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn form_options_cover_every_mood() {
        let opts = options();
        assert_eq!(opts.mood_labels.len(), 10);
        assert_eq!(mood_label(opts.default_mood), Some(opts.mood_labels[4]));
        assert!(opts.common_symptoms.contains(&"Chest pain"));
    }

    #[test]
    fn red_flag_rules() {
        assert_eq!(
            detect_red_flags(&strings(&["Chest pain"]), "", 5),
            vec!["Cardiovascular symptoms"]
        );
        assert_eq!(
            detect_red_flags(&[], "the pain is UNBEARABLE", 5),
            vec!["Severe symptoms"]
        );
        assert_eq!(
            detect_red_flags(&strings(&["Headache"]), "thinking about self-harm", 2),
            vec!["Mental health crisis", "Very low mood"]
        );
        assert!(detect_red_flags(&strings(&["Cough"]), "mild", 3).is_empty());
    }

    #[test]
    fn cardiovascular_needs_exact_symptom() {
        assert!(detect_red_flags(&[], "some chest pain today", 6).is_empty());
    }

    #[test]
    fn prompt_only_for_patient_without_todays_check_in() {
        let mut store = signed_in(None);
        assert!(should_prompt(store.state(), day()));

        submit(&mut store, &RecordingNotifier::default(), CheckInForm::default(), day(), now()).unwrap();
        assert!(!should_prompt(store.state(), day()));
        assert!(should_prompt(store.state(), day().succ_opt().unwrap()));
    }

    #[test]
    fn skip_hides_prompt() {
        let mut store = signed_in(None);
        skip(&mut store);
        assert!(!should_prompt(store.state(), day()));
    }

    #[test]
    fn no_prompt_for_guests() {
        let store = Store::in_memory();
        assert!(!should_prompt(store.state(), day()));
    }

    #[test]
    fn submit_rejects_bad_mood() {
        let mut store = signed_in(None);
        let form = CheckInForm {
            mood: 11,
            ..CheckInForm::default()
        };
        let err = submit(&mut store, &RecordingNotifier::default(), form, day(), now()).unwrap_err();
        assert!(matches!(err, CheckInError::MoodOutOfRange(11)));
        assert!(store.state().daily_check_ins.is_empty());
    }

    #[test]
    fn flagged_check_in_notifies_contact() {
        let mut store = signed_in(Some("+91 90000 00000"));
        let notifier = RecordingNotifier::default();
        let form = CheckInForm {
            mood: 1,
            symptoms: strings(&["Chest pain", " Chest pain ", ""]),
            notes: String::new(),
        };

        let receipt = submit(&mut store, &notifier, form, day(), now()).unwrap();
        assert_eq!(receipt.check_in.symptoms, vec!["Chest pain"]);
        assert_eq!(
            receipt.check_in.red_flags,
            vec!["Cardiovascular symptoms", "Very low mood"]
        );
        assert_eq!(store.state().daily_check_ins.len(), 1);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].contact.name, "Emergency Contact");
        assert_eq!(sent[0].patient_name, "Asha");
        assert!(receipt.alert.unwrap().contains("Cardiovascular symptoms, Very low mood"));
    }

    #[test]
    fn flagged_without_contact_stays_quiet() {
        let mut store = signed_in(None);
        let notifier = RecordingNotifier::default();
        let form = CheckInForm {
            mood: 1,
            ..CheckInForm::default()
        };
        let receipt = submit(&mut store, &notifier, form, day(), now()).unwrap();
        assert!(receipt.alert.is_none());
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn mood_labels() {
        assert_eq!(mood_label(1), Some("😰 Terrible"));
        assert_eq!(mood_label(10), Some("😌 Peaceful"));
        assert_eq!(mood_label(0), None);
    }
}
