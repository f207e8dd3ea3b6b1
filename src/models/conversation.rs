use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of the assistant's side of a chat exchange.
///
/// A message is first stored `Pending` and later replaced in place (same id)
/// once the reply arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChatReply {
    #[default]
    Pending,
    Complete(String),
}

impl ChatReply {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Pending => None,
            Self::Complete(text) => Some(text),
        }
    }
}

/// One user message and the assistant's reply to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub message: String,
    /// Stored as the `response` text; an empty string is a pending reply.
    #[serde(rename = "response", with = "reply_text", default)]
    pub reply: ChatReply,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_red_flag: Option<bool>,
}

impl ChatMessage {
    /// First phase: the user's message with no reply yet.
    pub fn pending(user_id: &str, message: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("msg_{}", Uuid::new_v4().simple()),
            user_id: user_id.to_string(),
            message: message.to_string(),
            reply: ChatReply::Pending,
            timestamp,
            is_red_flag: None,
        }
    }

    /// Second phase: same id, reply filled in.
    pub fn completed(mut self, reply: String, is_red_flag: bool) -> Self {
        self.reply = ChatReply::Complete(reply);
        self.is_red_flag = Some(is_red_flag);
        self
    }

    pub fn is_pending(&self) -> bool {
        self.reply == ChatReply::Pending
    }

    pub fn is_red_flag(&self) -> bool {
        self.is_red_flag.unwrap_or(false)
    }
}

mod reply_text {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ChatReply;

    pub fn serialize<S: Serializer>(reply: &ChatReply, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(reply.text().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ChatReply, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if text.is_empty() {
            Ok(ChatReply::Pending)
        } else {
            Ok(ChatReply::Complete(text))
        }
    }
}
