//! Patient-side commands: doses, check-ins, chat, calendar and sharing.

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

use crate::adherence::{self, DoseSlot, PatientStats};
use crate::auth;
use crate::calendar::{self, CalendarCursor};
use crate::chat::{self, ChatExchange};
use crate::check_in::{self, CheckInForm, CheckInOptions, CheckInReceipt};
use crate::core_state::CoreState;
use crate::models::{CalendarMode, ChatMessage, DailyLog, ShareableLink, SharedSections};
use crate::share::{self, ShareView};

use super::Clock;

pub fn today(core: &CoreState, clock: &Clock) -> Result<Vec<DoseSlot>, String> {
    let state = core.store().state();
    let patient = auth::require_patient(state).map_err(|e| e.to_string())?;
    Ok(adherence::todays_doses(state, &patient.id, clock.today(), clock.time()))
}

pub fn take(core: &mut CoreState, medicine_id: &str, timing: &str, clock: &Clock) -> Result<DailyLog, String> {
    let patient_id = patient_id(core)?;
    adherence::toggle_dose(
        core.store_mut(),
        &patient_id,
        medicine_id,
        timing,
        clock.today(),
        clock.utc(),
    )
    .map_err(|e| e.to_string())
}

pub fn stats(core: &CoreState, clock: &Clock) -> Result<PatientStats, String> {
    let state = core.store().state();
    let patient = auth::require_patient(state).map_err(|e| e.to_string())?;
    Ok(adherence::patient_stats(state, &patient.id, clock.today(), clock.time()))
}

pub fn check_in(core: &mut CoreState, form: CheckInForm, clock: &Clock) -> Result<CheckInReceipt, String> {
    let (store, _, notifier) = core.parts_mut();
    check_in::submit(store, notifier, form, clock.today(), clock.utc()).map_err(|e| e.to_string())
}

pub fn check_in_options() -> Result<CheckInOptions, String> {
    Ok(check_in::options())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInPrompt {
    pub show_daily_check_in: bool,
}

pub fn skip_check_in(core: &mut CoreState) -> Result<CheckInPrompt, String> {
    patient_id(core)?;
    check_in::skip(core.store_mut());
    Ok(CheckInPrompt {
        show_daily_check_in: core.store().state().show_daily_check_in,
    })
}

pub fn chat(core: &mut CoreState, message: &str, clock: &Clock) -> Result<ChatExchange, String> {
    let (store, gateway, notifier) = core.parts_mut();
    chat::send_message(store, gateway, notifier, message, clock.utc()).map_err(|e| e.to_string())
}

pub fn history(core: &CoreState) -> Result<Vec<ChatMessage>, String> {
    let state = core.store().state();
    let user = auth::current_user(state).map_err(|e| e.to_string())?;
    Ok(chat::history(state, &user.id).into_iter().cloned().collect())
}

#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum CalendarOutput {
    Month {
        #[serde(flatten)]
        view: calendar::MonthView,
    },
    Week {
        title: String,
        days: Vec<calendar::ScheduleDay>,
    },
    Day {
        #[serde(flatten)]
        day: calendar::ScheduleDay,
    },
}

pub fn calendar(
    core: &CoreState,
    mode: CalendarMode,
    anchor: NaiveDate,
    offset: i32,
    clock: &Clock,
) -> Result<CalendarOutput, String> {
    let state = core.store().state();
    let user = auth::current_user(state).map_err(|e| e.to_string())?;
    let scope = calendar::scope_for(user);

    let cursor = CalendarCursor::new(mode, anchor)
        .shifted(offset)
        .ok_or_else(|| format!("Calendar offset {offset} is out of range"))?;

    Ok(match mode {
        CalendarMode::Month => CalendarOutput::Month {
            view: calendar::month_view(state, scope, cursor.date, clock.today()),
        },
        CalendarMode::Week => CalendarOutput::Week {
            title: cursor.title(),
            days: calendar::week_view(state, scope, cursor.date, clock.today(), clock.time()),
        },
        CalendarMode::Day => CalendarOutput::Day {
            day: calendar::day_view(state, scope, cursor.date, clock.today(), clock.time()),
        },
    })
}

pub fn share(
    core: &mut CoreState,
    tracks: bool,
    progress: bool,
    hours: Option<i64>,
    clock: &Clock,
) -> Result<ShareableLink, String> {
    let valid_for = match hours {
        Some(h) if h <= 0 => return Err("Link lifetime must be at least one hour".to_string()),
        Some(h) => Some(TimeDelta::try_hours(h).ok_or_else(|| format!("Link lifetime too long: {h} hours"))?),
        None => None,
    };
    share::create_link(core.store_mut(), SharedSections { tracks, progress }, valid_for, clock.utc())
        .map_err(|e| e.to_string())
}

pub fn open_share(core: &CoreState, link_id: &str, code: &str, clock: &Clock) -> Result<ShareView, String> {
    share::open_link(core.store().state(), link_id, code, clock.utc()).map_err(|e| e.to_string())
}

fn patient_id(core: &CoreState) -> Result<String, String> {
    auth::require_patient(core.store().state())
        .map(|u| u.id.clone())
        .map_err(|e| e.to_string())
}
