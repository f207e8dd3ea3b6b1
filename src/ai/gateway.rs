use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::{AiError, ChatCompletion};
use crate::models::{AppState, DailyCheckIn};
use crate::safety::{KeywordClassifier, RedFlagClassifier};

pub const NOT_CONFIGURED_MESSAGE: &str =
    "The AI assistant is not configured. Please contact support.";
pub const EMPTY_REPLY_MESSAGE: &str =
    "I apologize, but I encountered an error processing your request.";

/// Words in the patient's message that mark it urgent without being triggers.
const URGENT_WORDS: &[&str] = &["emergency", "urgent", "severe"];
/// Phrases in the assistant's reply that mark the exchange urgent.
const URGENT_REPLY_PHRASES: &[&str] = &["emergency", "seek immediate"];

static BOLD_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

/// Result of asking the assistant. Always produced, even on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiResponse {
    pub message: String,
    pub is_emergency: bool,
    /// Red-flag phrases found in the patient's message.
    pub triggers: Vec<String>,
}

impl AiResponse {
    fn fallback(message: String) -> Self {
        Self {
            message,
            is_emergency: false,
            triggers: Vec::new(),
        }
    }
}

/// What the assistant is told about the patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    /// Conditions of the patient's active tracks.
    pub current_tracks: Vec<String>,
    pub recent_check_ins: Vec<DailyCheckIn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl UserContext {
    pub const RECENT_CHECK_INS: usize = 3;

    pub fn for_user(state: &AppState, user_id: &str) -> Self {
        let current_tracks = state
            .tracks_for_patient(user_id)
            .filter(|t| t.is_active)
            .map(|t| t.condition.clone())
            .collect();

        let check_ins: Vec<_> = state.check_ins_for_user(user_id).cloned().collect();
        let skip = check_ins.len().saturating_sub(Self::RECENT_CHECK_INS);
        let recent_check_ins = check_ins.into_iter().skip(skip).collect();

        let age = state
            .find_user(user_id)
            .or(state.user.as_ref().filter(|u| u.id == user_id))
            .and_then(|u| u.age);

        Self {
            current_tracks,
            recent_check_ins,
            age,
        }
    }
}

/// Front door to the chat assistant.
///
/// Never fails toward the caller: an unconfigured key, a transport error or a
/// bad status all come back as a non-emergency message.
pub struct AiGateway {
    client: Option<Box<dyn ChatCompletion>>,
    classifier: Box<dyn RedFlagClassifier>,
}

impl AiGateway {
    pub fn new(client: Box<dyn ChatCompletion>) -> Self {
        Self {
            client: Some(client),
            classifier: Box::new(KeywordClassifier::default()),
        }
    }

    /// Gateway with no usable API key; answers with the fixed notice.
    pub fn unconfigured() -> Self {
        Self {
            client: None,
            classifier: Box::new(KeywordClassifier::default()),
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn RedFlagClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn ask(&self, message: &str, context: Option<&UserContext>) -> AiResponse {
        let Some(client) = &self.client else {
            return AiResponse::fallback(NOT_CONFIGURED_MESSAGE.to_string());
        };

        let system = system_prompt(context);
        let reply = match client.complete(&system, message) {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_REPLY_MESSAGE.to_string(),
            Err(e) => {
                tracing::error!(error = %e, "AI service error");
                return AiResponse::fallback(failure_message(&e));
            }
        };

        let triggers = self.classifier.triggers(message);
        let is_emergency = !triggers.is_empty()
            || contains_any(message, URGENT_WORDS)
            || contains_any(&reply, URGENT_REPLY_PHRASES);

        if is_emergency {
            tracing::warn!(triggers = ?triggers, "Chat message flagged as emergency");
        }

        AiResponse {
            message: reply,
            is_emergency,
            triggers,
        }
    }
}

fn system_prompt(context: Option<&UserContext>) -> String {
    let context = context
        .and_then(|c| serde_json::to_string(c).ok())
        .unwrap_or_else(|| "No additional context".to_string());

    format!(
        "You are Arogya Sahayak AI, a helpful medical assistant. Provide accurate, empathetic \
medical information while always recommending consulting healthcare professionals for serious \
concerns.

IMPORTANT: If the user mentions any serious symptoms like chest pain, difficulty breathing, \
severe headache, sudden weakness, seizures, high fever, suicidal thoughts, or other emergency \
symptoms, flag this as a red flag and recommend immediate medical attention.

User context: {context}

Please respond helpfully and identify any red flag symptoms."
    )
}

fn failure_message(error: &AiError) -> String {
    format!(
        "I apologize, but I'm currently unable to respond due to a technical issue. Please \
consult with your healthcare provider if you have medical concerns. \n\nError: {error}"
    )
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    let lower = text.to_lowercase();
    words.iter().any(|w| lower.contains(w))
}

/// Strip markdown bold markers for plain-text display.
pub fn clean_response(text: &str) -> String {
    BOLD_MARKERS.replace_all(text, "$1").into_owned()
}
