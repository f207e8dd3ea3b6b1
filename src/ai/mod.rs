//! Chat assistant: provider client, request building and emergency
//! classification of each exchange.

pub mod client;
pub mod gateway;

pub use client::{ChatCompletion, MockCompletion, OpenRouterClient};
pub use gateway::{clean_response, AiGateway, AiResponse, UserContext};

use crate::config::AiConfig;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AiError {
    #[error("AI assistant is not configured")]
    NotConfigured,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("API request failed: {0}. Please check your API key and OpenRouter account status.")]
    Status(u16),

    #[error("Malformed AI response: {0}")]
    ResponseParse(String),
}

/// Gateway for the given settings; unconfigured when the key is unusable.
pub fn gateway_from_config(config: &AiConfig) -> AiGateway {
    if !config.is_configured() {
        tracing::info!("No AI API key configured, assistant disabled");
        return AiGateway::unconfigured();
    }
    match OpenRouterClient::new(config) {
        Ok(client) => {
            tracing::info!(model = %client.model(), "AI assistant ready");
            AiGateway::new(Box::new(client))
        }
        Err(e) => {
            tracing::error!(error = %e, "Cannot build AI client, assistant disabled");
            AiGateway::unconfigured()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_key_yields_unconfigured_gateway() {
        let config = AiConfig {
            api_key: Some(crate::config::PLACEHOLDER_API_KEY.into()),
            ..AiConfig::default()
        };
        assert!(!gateway_from_config(&config).is_configured());
    }

    #[test]
    fn real_key_yields_configured_gateway() {
        let config = AiConfig {
            api_key: Some("sk-or-v1-abc".into()),
            ..AiConfig::default()
        };
        assert!(gateway_from_config(&config).is_configured());
    }

    #[test]
    fn status_error_message() {
        assert_eq!(
            AiError::Status(429).to_string(),
            "API request failed: 429. Please check your API key and OpenRouter account status."
        );
    }
}
