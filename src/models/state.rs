use serde::{Deserialize, Deserializer, Serialize};

use super::{
    Appointment, ChatMessage, DailyCheckIn, DailyLog, Doctor, MedicineTrack, ShareableLink, Theme,
    User,
};

pub const DEFAULT_LANGUAGE: &str = "en";

/// The whole application state: session, domain collections and preferences.
///
/// Serialized verbatim as the persisted snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Session copy of the logged-in user.
    pub user: Option<User>,
    pub users: Vec<User>,
    pub tracks: Vec<MedicineTrack>,
    pub daily_logs: Vec<DailyLog>,
    pub doctors: Vec<Doctor>,
    pub appointments: Vec<Appointment>,
    pub daily_check_ins: Vec<DailyCheckIn>,
    pub chat_history: Vec<ChatMessage>,
    #[serde(default)]
    pub shareable_links: Vec<ShareableLink>,
    pub is_authenticated: bool,
    pub theme: Theme,
    pub language: String,
    pub show_daily_check_in: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            user: None,
            users: Vec::new(),
            tracks: Vec::new(),
            daily_logs: Vec::new(),
            doctors: vec![
                Doctor {
                    id: "doc_1".into(),
                    name: "Emily Carter".into(),
                    email: "emily.carter@clinic.com".into(),
                    specialization: "Cardiology".into(),
                    patients: Vec::new(),
                    license_number: "DOC001".into(),
                },
                Doctor {
                    id: "doc_2".into(),
                    name: "Ben Adams".into(),
                    email: "ben.adams@clinic.com".into(),
                    specialization: "General Medicine".into(),
                    patients: Vec::new(),
                    license_number: "DOC002".into(),
                },
            ],
            appointments: Vec::new(),
            daily_check_ins: Vec::new(),
            chat_history: Vec::new(),
            shareable_links: Vec::new(),
            is_authenticated: false,
            theme: Theme::Light,
            language: DEFAULT_LANGUAGE.into(),
            show_daily_check_in: true,
        }
    }
}

impl AppState {
    pub fn find_user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_doctor(&self, id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == id)
    }

    pub fn find_doctor_by_email(&self, email: &str) -> Option<&Doctor> {
        self.doctors
            .iter()
            .find(|d| d.email.eq_ignore_ascii_case(email))
    }

    pub fn find_track(&self, id: &str) -> Option<&MedicineTrack> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn tracks_for_patient<'a>(
        &'a self,
        patient_id: &'a str,
    ) -> impl Iterator<Item = &'a MedicineTrack> + 'a {
        self.tracks.iter().filter(move |t| t.patient_id == patient_id)
    }

    pub fn check_ins_for_user<'a>(
        &'a self,
        user_id: &'a str,
    ) -> impl Iterator<Item = &'a DailyCheckIn> + 'a {
        self.daily_check_ins.iter().filter(move |c| c.user_id == user_id)
    }

    pub fn chat_for_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a ChatMessage> + 'a {
        self.chat_history.iter().filter(move |m| m.user_id == user_id)
    }

    /// Shallow merge: every field present in `patch` replaces the current one.
    pub fn merge(&mut self, patch: AppStatePatch) {
        if let Some(user) = patch.user {
            self.user = user;
        }
        if let Some(users) = patch.users {
            self.users = users;
        }
        if let Some(tracks) = patch.tracks {
            self.tracks = tracks;
        }
        if let Some(logs) = patch.daily_logs {
            self.daily_logs = logs;
        }
        if let Some(doctors) = patch.doctors {
            self.doctors = doctors;
        }
        if let Some(appointments) = patch.appointments {
            self.appointments = appointments;
        }
        if let Some(check_ins) = patch.daily_check_ins {
            self.daily_check_ins = check_ins;
        }
        if let Some(chat) = patch.chat_history {
            self.chat_history = chat;
        }
        if let Some(links) = patch.shareable_links {
            self.shareable_links = links;
        }
        if let Some(flag) = patch.is_authenticated {
            self.is_authenticated = flag;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(flag) = patch.show_daily_check_in {
            self.show_daily_check_in = flag;
        }
    }
}

/// A partial [`AppState`]: the payload of `LOAD_DATA` and the shape a
/// snapshot is parsed into. Absent fields leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStatePatch {
    /// Outer `None`: field absent. `Some(None)`: explicit `null` (logged out).
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub user: Option<Option<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<MedicineTrack>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_logs: Option<Vec<DailyLog>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctors: Option<Vec<Doctor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointments: Option<Vec<Appointment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_check_ins: Option<Vec<DailyCheckIn>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<Vec<ChatMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shareable_links: Option<Vec<ShareableLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_authenticated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_daily_check_in: Option<bool>,
}

impl From<AppState> for AppStatePatch {
    fn from(state: AppState) -> Self {
        Self {
            user: Some(state.user),
            users: Some(state.users),
            tracks: Some(state.tracks),
            daily_logs: Some(state.daily_logs),
            doctors: Some(state.doctors),
            appointments: Some(state.appointments),
            daily_check_ins: Some(state.daily_check_ins),
            chat_history: Some(state.chat_history),
            shareable_links: Some(state.shareable_links),
            is_authenticated: Some(state.is_authenticated),
            theme: Some(state.theme),
            language: Some(state.language),
            show_daily_check_in: Some(state.show_daily_check_in),
        }
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
