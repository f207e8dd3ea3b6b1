//! Preferences, translations and raw access to the store.

use std::path::Path;

use serde::Serialize;

use crate::core_state::CoreState;
use crate::i18n;
use crate::models::{AppState, Theme};
use crate::store::{Action, Outcome};

#[derive(Debug, Serialize)]
pub struct ThemeSetting {
    pub theme: Theme,
}

pub fn toggle_theme(core: &mut CoreState) -> Result<ThemeSetting, String> {
    core.store_mut().dispatch(Action::ToggleTheme);
    Ok(ThemeSetting {
        theme: core.store().state().theme,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSetting {
    pub show_daily_check_in: bool,
}

pub fn set_reminders(core: &mut CoreState, on: bool) -> Result<ReminderSetting, String> {
    core.store_mut().dispatch(Action::SetShowDailyCheckIn(on));
    tracing::info!(on, "Check-in reminder changed");
    Ok(ReminderSetting {
        show_daily_check_in: core.store().state().show_daily_check_in,
    })
}

#[derive(Debug, Serialize)]
pub struct LanguageSetting {
    pub language: String,
}

pub fn set_language(core: &mut CoreState, code: &str) -> Result<LanguageSetting, String> {
    let code = code.trim();
    if !i18n::is_supported(code) {
        return Err(format!(
            "Unsupported language \"{code}\" (supported: {})",
            i18n::SUPPORTED_LANGUAGES.join(", ")
        ));
    }
    core.store_mut().dispatch(Action::SetLanguage(code.to_string()));
    tracing::info!(language = %code, "Language changed");
    Ok(LanguageSetting {
        language: core.store().state().language.clone(),
    })
}

#[derive(Debug, Serialize)]
pub struct Translation {
    pub key: String,
    pub language: String,
    pub text: String,
}

pub fn translate(core: &CoreState, key: &str, language: Option<&str>) -> Result<Translation, String> {
    let language = language.unwrap_or(&core.store().state().language).to_string();
    Ok(Translation {
        key: key.to_string(),
        text: i18n::t(key, &language),
        language,
    })
}

pub fn dispatch(core: &mut CoreState, raw: &str) -> Result<Outcome, String> {
    core.store_mut().dispatch_json(raw).map_err(|e| e.to_string())
}

pub fn import(core: &mut CoreState, path: &Path) -> Result<Outcome, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
    let outcome = core.store_mut().import(&raw).map_err(|e| e.to_string())?;
    tracing::info!(path = %path.display(), "Snapshot imported");
    Ok(outcome)
}

pub fn show(core: &CoreState) -> Result<AppState, String> {
    Ok(core.store().state().clone())
}
