use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: String,
    pub name: String,
    pub dosage: String,
    /// Free-form label, e.g. "2 times daily".
    pub frequency: String,
    /// Times of day as "HH:MM", in prescription order.
    #[serde(default)]
    pub timings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// A patient's prescription for one condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineTrack {
    pub id: String,
    pub patient_id: String,
    pub condition: String,
    #[serde(default)]
    pub medicines: Vec<Medicine>,
    pub start_date: DateTime<Utc>,
    /// `None` means the track is open-ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// 0-100. Set by whoever writes the track; the store never recomputes it.
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MedicineTrack {
    /// Whether `day` falls between the start date and the (optional) end date,
    /// both inclusive.
    pub fn covers(&self, day: NaiveDate) -> bool {
        if day < self.start_date.date_naive() {
            return false;
        }
        match self.end_date {
            Some(end) => day <= end.date_naive(),
            None => true,
        }
    }

    /// Number of scheduled doses per day across all medicines.
    pub fn daily_dose_count(&self) -> usize {
        self.medicines.iter().map(|m| m.timings.len()).sum()
    }
}

/// Whether one scheduled dose was taken on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    #[serde(with = "super::calendar_date")]
    pub date: NaiveDate,
    pub medicine_id: String,
    #[serde(default)]
    pub track_id: String,
    pub timing: String,
    pub taken: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<DateTime<Utc>>,
}

/// Identity of a dose: at most one log exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogKey<'a> {
    pub date: NaiveDate,
    pub medicine_id: &'a str,
    pub timing: &'a str,
}

impl DailyLog {
    pub fn key(&self) -> LogKey<'_> {
        LogKey {
            date: self.date,
            medicine_id: &self.medicine_id,
            timing: &self.timing,
        }
    }
}
