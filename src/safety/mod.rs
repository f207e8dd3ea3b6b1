//! Emergency detection and escalation.
//!
//! `keywords` finds red-flag phrases in what a patient writes; `notifier`
//! hands an alert to the patient's emergency contact.

pub mod keywords;
pub mod notifier;

pub use keywords::{KeywordClassifier, RedFlagClassifier, RED_FLAG_KEYWORDS};
pub use notifier::{EmergencyAlert, EmergencyNotifier, LogNotifier, NotifyError, RecordingNotifier};
