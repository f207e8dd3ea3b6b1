pub mod appointment;
pub mod check_in;
pub mod conversation;
pub mod enums;
pub mod medication;
pub mod share;
pub mod state;
pub mod user;

pub use appointment::Appointment;
pub use check_in::DailyCheckIn;
pub use conversation::{ChatMessage, ChatReply};
pub use enums::{CalendarMode, DoseStatus, Theme, UserType};
pub use medication::{DailyLog, LogKey, Medicine, MedicineTrack};
pub use share::{ShareableLink, SharedSections};
pub use state::{AppState, AppStatePatch, DEFAULT_LANGUAGE};
pub use user::{Doctor, EmergencyContact, User};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// Calendar dates stored as "YYYY-MM-DD".
///
/// Older snapshots may hold a full timestamp instead; only its date part is kept.
pub(crate) mod calendar_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(date) = NaiveDate::parse_from_str(&raw, FORMAT) {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.date_naive())
            .map_err(|_| D::Error::custom(format!("invalid calendar date: {raw}")))
    }
}
