use serde::{Deserialize, Serialize};

use crate::models::{
    AppStatePatch, Appointment, ChatMessage, DailyCheckIn, DailyLog, Doctor, MedicineTrack,
    ShareableLink, User,
};

/// Every state change goes through one of these.
///
/// JSON form is `{"type": "ADD_TRACK", "payload": {...}}`. Tags outside the
/// vocabulary decode to [`Action::Unknown`], which the reducer ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Login(User),
    Logout,
    #[serde(rename_all = "camelCase")]
    AddPatient {
        patient: User,
        doctor_id: String,
    },
    UpdateUser(User),
    AddTrack(MedicineTrack),
    UpdateTrack(MedicineTrack),
    DeleteTrack(String),
    LogMedicine(DailyLog),
    AddDoctor(Doctor),
    AddAppointment(Appointment),
    AddCheckIn(DailyCheckIn),
    AddChatMessage(ChatMessage),
    AddShareLink(ShareableLink),
    ToggleTheme,
    SetLanguage(String),
    SetShowDailyCheckIn(bool),
    LoadData(AppStatePatch),
    #[serde(other)]
    Unknown,
}

/// Tags of the closed action vocabulary.
pub const KINDS: &[&str] = &[
    "LOGIN",
    "LOGOUT",
    "ADD_PATIENT",
    "UPDATE_USER",
    "ADD_TRACK",
    "UPDATE_TRACK",
    "DELETE_TRACK",
    "LOG_MEDICINE",
    "ADD_DOCTOR",
    "ADD_APPOINTMENT",
    "ADD_CHECK_IN",
    "ADD_CHAT_MESSAGE",
    "ADD_SHARE_LINK",
    "TOGGLE_THEME",
    "SET_LANGUAGE",
    "SET_SHOW_DAILY_CHECK_IN",
    "LOAD_DATA",
];

impl Action {
    /// Decode an action from JSON text.
    ///
    /// An unrecognised `type` yields `Unknown` whatever its payload; a
    /// recognised tag with a malformed payload is an error.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let known = value
            .get("type")
            .and_then(|t| t.as_str())
            .is_some_and(|t| KINDS.contains(&t));
        if !known {
            return Ok(Self::Unknown);
        }
        serde_json::from_value(value)
    }

    /// The wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Login(_) => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::AddPatient { .. } => "ADD_PATIENT",
            Self::UpdateUser(_) => "UPDATE_USER",
            Self::AddTrack(_) => "ADD_TRACK",
            Self::UpdateTrack(_) => "UPDATE_TRACK",
            Self::DeleteTrack(_) => "DELETE_TRACK",
            Self::LogMedicine(_) => "LOG_MEDICINE",
            Self::AddDoctor(_) => "ADD_DOCTOR",
            Self::AddAppointment(_) => "ADD_APPOINTMENT",
            Self::AddCheckIn(_) => "ADD_CHECK_IN",
            Self::AddChatMessage(_) => "ADD_CHAT_MESSAGE",
            Self::AddShareLink(_) => "ADD_SHARE_LINK",
            Self::ToggleTheme => "TOGGLE_THEME",
            Self::SetLanguage(_) => "SET_LANGUAGE",
            Self::SetShowDailyCheckIn(_) => "SET_SHOW_DAILY_CHECK_IN",
            Self::LoadData(_) => "LOAD_DATA",
            Self::Unknown => "UNKNOWN",
        }
    }
}
