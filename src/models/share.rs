use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only access token exposing part of a patient's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareableLink {
    pub id: String,
    pub user_id: String,
    /// Six upper-case alphanumerics, shared separately from the link.
    pub access_code: String,
    pub shared_data: SharedSections,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShareableLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Which parts of the patient's data a link exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSections {
    #[serde(default)]
    pub tracks: bool,
    #[serde(default)]
    pub progress: bool,
}

impl Default for SharedSections {
    fn default() -> Self {
        Self {
            tracks: true,
            progress: true,
        }
    }
}
