use std::cell::RefCell;

use serde::Serialize;

use crate::models::EmergencyContact;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Emergency contact has no number")]
    MissingNumber,

    #[error("Emergency alert delivery failed: {0}")]
    Delivery(String),
}

/// An alert about a patient's red-flag symptoms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyAlert {
    pub contact: EmergencyContact,
    pub patient_name: String,
    pub symptoms: Vec<String>,
}

impl EmergencyAlert {
    /// Acknowledgment shown to the user once the alert is handed off.
    pub fn acknowledgment(&self) -> String {
        format!(
            "Emergency alert would be sent to {} ({}) about {}'s symptoms: {}",
            self.contact.name,
            self.contact.number,
            self.patient_name,
            self.symptoms.join(", ")
        )
    }
}

/// Delivers emergency alerts. Returns a user-visible acknowledgment.
pub trait EmergencyNotifier {
    fn notify(&self, alert: &EmergencyAlert) -> Result<String, NotifyError>;
}

/// Records the alert in the log. No SMS or email gateway is wired in.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl EmergencyNotifier for LogNotifier {
    fn notify(&self, alert: &EmergencyAlert) -> Result<String, NotifyError> {
        if alert.contact.number.trim().is_empty() {
            return Err(NotifyError::MissingNumber);
        }
        tracing::warn!(
            to = %alert.contact.number,
            contact_name = %alert.contact.name,
            patient = %alert.patient_name,
            symptoms = ?alert.symptoms,
            "Emergency alert"
        );
        Ok(alert.acknowledgment())
    }
}

/// Keeps every alert in memory; used by tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<EmergencyAlert>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<EmergencyAlert> {
        self.sent.borrow().clone()
    }
}

impl EmergencyNotifier for RecordingNotifier {
    fn notify(&self, alert: &EmergencyAlert) -> Result<String, NotifyError> {
        self.sent.borrow_mut().push(alert.clone());
        Ok(alert.acknowledgment())
    }
}
