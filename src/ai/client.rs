use std::cell::{Cell, RefCell};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AiError;
use crate::config::{AiConfig, APP_NAME};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;
const REFERER: &str = "app://arogya-sahayak";

/// A chat-completion backend: system + user message in, reply text out.
///
/// `Ok(None)` means the provider answered without any content.
pub trait ChatCompletion {
    fn complete(&self, system: &str, user: &str) -> Result<Option<String>, AiError>;
}

/// OpenRouter-compatible HTTP client (blocking).
pub struct OpenRouterClient {
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
    client: reqwest::blocking::Client,
}

impl OpenRouterClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = config.api_key.clone().ok_or(AiError::NotConfigured)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
            timeout: config.timeout,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [RequestMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl CompletionResponse {
    fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
    }
}

impl ChatCompletion for OpenRouterClient {
    fn complete(&self, system: &str, user: &str) -> Result<Option<String>, AiError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: [
                RequestMessage {
                    role: "system",
                    content: system,
                },
                RequestMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_NAME)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout.as_secs()
                    ))
                } else {
                    AiError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "AI API error");
            return Err(AiError::Status(status.as_u16()));
        }

        let parsed: CompletionResponse = response
            .json()
            .map_err(|e| AiError::ResponseParse(e.to_string()))?;
        Ok(parsed.first_content())
    }
}

/// Mock completion backend for testing: returns a fixed result and counts calls.
pub struct MockCompletion {
    reply: Result<Option<String>, AiError>,
    calls: Cell<usize>,
    last_system: RefCell<Option<String>>,
}

impl MockCompletion {
    pub fn replying(text: &str) -> Self {
        Self::with_result(Ok(Some(text.to_string())))
    }

    pub fn empty() -> Self {
        Self::with_result(Ok(None))
    }

    pub fn failing(error: AiError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(reply: Result<Option<String>, AiError>) -> Self {
        Self {
            reply,
            calls: Cell::new(0),
            last_system: RefCell::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// System prompt of the most recent call.
    pub fn last_system(&self) -> Option<String> {
        self.last_system.borrow().clone()
    }
}

impl ChatCompletion for MockCompletion {
    fn complete(&self, system: &str, _user: &str) -> Result<Option<String>, AiError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_system.borrow_mut() = Some(system.to_string());
        self.reply.clone()
    }
}
