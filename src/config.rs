use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Arogya Sahayak";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides the data directory (tests, portable installs).
pub const DATA_DIR_ENV: &str = "AROGYA_DATA_DIR";

pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const AI_MODEL_ENV: &str = "AROGYA_AI_MODEL";
pub const AI_URL_ENV: &str = "AROGYA_AI_URL";
pub const AI_TIMEOUT_ENV: &str = "AROGYA_AI_TIMEOUT_SECS";

pub const DEFAULT_AI_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "qwen/qwen-2.5-72b-instruct";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

/// Value shipped in sample configs; never a usable key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Get the application data directory
/// ~/ArogyaSahayak/ on all platforms, unless `AROGYA_DATA_DIR` is set.
/// Falls back to the working directory when no home directory exists.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ArogyaSahayak")
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "arogya_lib=info,arogya=info"
}

/// Settings for the chat-completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_AI_URL.to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

impl AiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let timeout = match get(AI_TIMEOUT_ENV).map(|v| v.parse::<u64>()) {
            Some(Ok(secs)) if secs > 0 => Duration::from_secs(secs),
            Some(_) => {
                tracing::warn!(var = AI_TIMEOUT_ENV, "Invalid timeout, using default");
                defaults.timeout
            }
            None => defaults.timeout,
        };

        Self {
            api_key: get(API_KEY_ENV),
            endpoint: get(AI_URL_ENV).unwrap_or(defaults.endpoint),
            model: get(AI_MODEL_ENV).unwrap_or(defaults.model),
            timeout,
        }
    }

    /// A key is usable when present, non-empty and not the placeholder.
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty() && k != PLACEHOLDER_API_KEY)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_ends_with_app_folder() {
        if std::env::var_os(DATA_DIR_ENV).is_none() {
            assert!(app_data_dir().ends_with("ArogyaSahayak"));
        }
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn ai_config_defaults() {
        let config = AiConfig::from_lookup(lookup(&[]));
        assert_eq!(config.endpoint, DEFAULT_AI_URL);
        assert_eq!(config.model, "qwen/qwen-2.5-72b-instruct");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(!config.is_configured());
    }

    #[test]
    fn ai_config_overrides() {
        let config = AiConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "sk-or-123"),
            (AI_MODEL_ENV, "meta/llama"),
            (AI_TIMEOUT_ENV, "5"),
        ]));
        assert!(config.is_configured());
        assert_eq!(config.model, "meta/llama");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn placeholder_and_blank_keys_are_unconfigured() {
        assert!(!AiConfig::from_lookup(lookup(&[(API_KEY_ENV, PLACEHOLDER_API_KEY)])).is_configured());
        assert!(!AiConfig::from_lookup(lookup(&[(API_KEY_ENV, "   ")])).is_configured());
    }

    #[test]
    fn bad_timeout_falls_back() {
        let config = AiConfig::from_lookup(lookup(&[(AI_TIMEOUT_ENV, "soon")]));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS));
    }
}
