use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A patient's daily self-report of mood and symptoms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCheckIn {
    pub id: String,
    pub user_id: String,
    #[serde(with = "super::calendar_date")]
    pub date: NaiveDate,
    /// 1-10.
    pub mood: u8,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub notes: String,
    /// Derived at submission time, see `check_in::detect_red_flags`.
    #[serde(default)]
    pub red_flags: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl DailyCheckIn {
    pub fn has_red_flags(&self) -> bool {
        !self.red_flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hydrated_browser_date() {
        // A browser export may carry the date re-serialized as a full timestamp.
        let json = r#"{"id":"c1","userId":"PAT1","date":"2026-10-19T00:00:00.000Z","mood":7,
                       "symptoms":["Fatigue"],"notes":"","redFlags":[],
                       "timestamp":"2026-10-19T09:12:00.000Z"}"#;
        let c: DailyCheckIn = serde_json::from_str(json).unwrap();
        assert_eq!(c.date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert!(!c.has_red_flags());

        let out = serde_json::to_value(&c).unwrap();
        assert_eq!(out["date"], "2026-10-19");
    }
}
