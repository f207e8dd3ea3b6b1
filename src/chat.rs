//! Chat with the AI health assistant.
//!
//! A message is stored twice: first without a reply so it shows up at once,
//! then replaced in place (same id) with the reply and the emergency flag.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ai::{clean_response, AiGateway, UserContext};
use crate::auth::{self, AuthError};
use crate::models::{AppState, ChatMessage};
use crate::safety::{EmergencyAlert, EmergencyNotifier};
use crate::store::{Action, Store};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Message is empty")]
    EmptyMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatExchange {
    pub message: ChatMessage,
    /// Reply with markdown bold markers removed.
    pub display_reply: String,
    pub triggers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
}

pub fn send_message(
    store: &mut Store,
    gateway: &AiGateway,
    notifier: &dyn EmergencyNotifier,
    text: &str,
    now: DateTime<Utc>,
) -> Result<ChatExchange, ChatError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    let user = auth::current_user(store.state())?.clone();

    let pending = ChatMessage::pending(&user.id, text, now);
    store.dispatch(Action::AddChatMessage(pending.clone()));

    let context = UserContext::for_user(store.state(), &user.id);
    let response = gateway.ask(text, Some(&context));

    let message = pending.completed(response.message, response.is_emergency);
    store.dispatch(Action::AddChatMessage(message.clone()));
    tracing::info!(
        user_id = %user.id,
        message_id = %message.id,
        is_emergency = response.is_emergency,
        "Chat reply stored"
    );

    let alert = match user.emergency_contact() {
        Some(contact) if response.is_emergency => {
            let alert = EmergencyAlert {
                contact,
                patient_name: user.name.clone(),
                symptoms: response.triggers.clone(),
            };
            notifier
                .notify(&alert)
                .inspect_err(|e| tracing::warn!(error = %e, user_id = %user.id, "Emergency alert not sent"))
                .ok()
        }
        _ => None,
    };

    Ok(ChatExchange {
        display_reply: clean_response(message.reply.text().unwrap_or_default()),
        message,
        triggers: response.triggers,
        alert,
    })
}

/// The user's conversation, oldest first.
pub fn history<'a>(state: &'a AppState, user_id: &'a str) -> Vec<&'a ChatMessage> {
    state.chat_for_user(user_id).collect()
}
