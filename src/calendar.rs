//! Month, week and day views over tracks, appointments and doses.
//!
//! Weeks start on Sunday. A patient sees their own schedule; a doctor sees
//! every patient's.

use chrono::{Datelike, Days, Local, Months, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::adherence::{self, DoseSlot};
use crate::models::{AppState, Appointment, CalendarMode, User};

pub const WEEK_DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The patient whose schedule `user` may see, `None` meaning everyone.
pub fn scope_for(user: &User) -> Option<&str> {
    user.is_patient().then_some(user.id.as_str())
}

// ─── Navigation ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCursor {
    pub mode: CalendarMode,
    pub date: NaiveDate,
}

impl CalendarCursor {
    pub fn new(mode: CalendarMode, date: NaiveDate) -> Self {
        Self { mode, date }
    }

    /// `steps` months, weeks or days away in one jump, `None` outside the
    /// representable date range. Month steps clamp to the month's end.
    pub fn shifted(self, steps: i32) -> Option<Self> {
        let n = steps.unsigned_abs();
        let days = match self.mode {
            CalendarMode::Month => 0,
            CalendarMode::Week => u64::from(n) * 7,
            CalendarMode::Day => u64::from(n),
        };
        let date = match (self.mode, steps >= 0) {
            (CalendarMode::Month, true) => self.date.checked_add_months(Months::new(n)),
            (CalendarMode::Month, false) => self.date.checked_sub_months(Months::new(n)),
            (_, true) => self.date.checked_add_days(Days::new(days)),
            (_, false) => self.date.checked_sub_days(Days::new(days)),
        }?;
        Some(Self { date, ..self })
    }

    pub fn title(&self) -> String {
        match self.mode {
            CalendarMode::Month | CalendarMode::Week => self.date.format("%B %Y").to_string(),
            CalendarMode::Day => day_title(self.date),
        }
    }
}

/// "Monday, October 19th, 2026".
pub fn day_title(date: NaiveDate) -> String {
    format!(
        "{}, {} {}, {}",
        date.format("%A"),
        date.format("%B"),
        ordinal(date.day()),
        date.year()
    )
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Days::new(6)
}

// ─── Month ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackBadge {
    pub id: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub tracks: Vec<TrackBadge>,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub title: String,
    /// Column headings, Sunday first.
    pub week_days: [&'static str; 7],
    /// Full Sunday-to-Saturday weeks covering the month.
    pub weeks: Vec<Vec<CalendarDay>>,
}

pub fn month_view(
    state: &AppState,
    patient_id: Option<&str>,
    anchor: NaiveDate,
    today: NaiveDate,
) -> MonthView {
    let first = anchor.with_day(1).unwrap_or(anchor);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(first);

    let days: Vec<CalendarDay> = week_start(first)
        .iter_days()
        .take_while(|d| *d <= week_end(last))
        .map(|date| CalendarDay {
            date,
            in_month: date.month() == first.month() && date.year() == first.year(),
            is_today: date == today,
            tracks: tracks_on(state, patient_id, date),
            appointments: appointments_on(state, patient_id, date),
        })
        .collect();

    MonthView {
        title: anchor.format("%B %Y").to_string(),
        week_days: WEEK_DAYS,
        weeks: days.chunks(7).map(<[CalendarDay]>::to_vec).collect(),
    }
}

/// Active tracks whose date range includes `date`.
pub fn tracks_on(state: &AppState, patient_id: Option<&str>, date: NaiveDate) -> Vec<TrackBadge> {
    state
        .tracks
        .iter()
        .filter(|t| t.is_active && patient_id.map_or(true, |p| t.patient_id == p) && t.covers(date))
        .map(|t| TrackBadge {
            id: t.id.clone(),
            condition: t.condition.clone(),
        })
        .collect()
}

/// Appointments falling on `date` in local time.
pub fn appointments_on(state: &AppState, patient_id: Option<&str>, date: NaiveDate) -> Vec<Appointment> {
    state
        .appointments
        .iter()
        .filter(|a| patient_id.map_or(true, |p| a.patient_id == p))
        .filter(|a| a.date.with_timezone(&Local).date_naive() == date)
        .cloned()
        .collect()
}

// ─── Week and day ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub title: String,
    pub is_today: bool,
    pub doses: Vec<DoseSlot>,
    pub completed: usize,
    /// Rounded share of doses taken; absent when nothing is scheduled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<u32>,
    pub appointments: Vec<Appointment>,
}

fn schedule_day(
    state: &AppState,
    patient_id: Option<&str>,
    date: NaiveDate,
    today: NaiveDate,
    now: NaiveTime,
) -> ScheduleDay {
    let doses = adherence::doses_on(state, patient_id, date, today, now);
    let completed = doses.iter().filter(|d| d.taken).count();
    let completion = (!doses.is_empty())
        .then(|| (completed as f64 / doses.len() as f64 * 100.0).round() as u32);
    ScheduleDay {
        date,
        title: date.format("%A, %b %-d").to_string(),
        is_today: date == today,
        completed,
        completion,
        doses,
        appointments: appointments_on(state, patient_id, date),
    }
}

/// The Sunday-to-Saturday week containing `anchor`.
pub fn week_view(
    state: &AppState,
    patient_id: Option<&str>,
    anchor: NaiveDate,
    today: NaiveDate,
    now: NaiveTime,
) -> Vec<ScheduleDay> {
    week_start(anchor)
        .iter_days()
        .take(7)
        .map(|date| schedule_day(state, patient_id, date, today, now))
        .collect()
}

pub fn day_view(
    state: &AppState,
    patient_id: Option<&str>,
    date: NaiveDate,
    today: NaiveDate,
    now: NaiveTime,
) -> ScheduleDay {
    let mut day = schedule_day(state, patient_id, date, today, now);
    day.title = day_title(date);
    day
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc, Weekday};

    use super::*;
    use crate::models::{DailyLog, Medicine, MedicineTrack};
    use crate::practice::local_datetime;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    fn state() -> AppState {
        let mut state = AppState::default();
        state.tracks.push(MedicineTrack {
            id: "t1".into(),
            patient_id: "PAT1".into(),
            condition: "Hypertension".into(),
            medicines: vec![Medicine {
                id: "m1".into(),
                name: "Amlodipine".into(),
                dosage: "5mg".into(),
                frequency: "Twice daily".into(),
                timings: vec!["08:00".into(), "20:00".into()],
                instructions: None,
            }],
            start_date: Utc.with_ymd_and_hms(2026, 10, 5, 0, 0, 0).unwrap(),
            end_date: Some(Utc.with_ymd_and_hms(2026, 10, 25, 0, 0, 0).unwrap()),
            is_active: true,
            completion_rate: 0.0,
            assigned_by: Some("doc_1".into()),
            notes: None,
        });
        state.appointments.push(Appointment {
            id: "a1".into(),
            patient_id: "PAT1".into(),
            doctor_id: "doc_1".into(),
            title: "Follow-up Consultation".into(),
            date: local_datetime("2026-10-21", "10:30").unwrap(),
            notes: None,
        });
        state
    }

    #[test]
    fn month_grid_is_whole_weeks() {
        // October 2026 starts on a Thursday and ends on a Saturday.
        let view = month_view(&state(), Some("PAT1"), d(2026, 10, 19), d(2026, 10, 19));
        assert_eq!(view.title, "October 2026");
        assert_eq!(view.week_days[0], "Sun");
        assert_eq!(view.weeks.len(), 5);
        assert!(view.weeks.iter().all(|w| w.len() == 7));
        assert_eq!(view.weeks[0][0].date, d(2026, 9, 27));
        assert_eq!(view.weeks[0][0].date.weekday(), Weekday::Sun);
        assert!(!view.weeks[0][0].in_month);
        assert_eq!(view.weeks[4][6].date, d(2026, 10, 31));
        assert_eq!(view.weeks.iter().flatten().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn month_days_carry_tracks_and_appointments() {
        let view = month_view(&state(), Some("PAT1"), d(2026, 10, 1), d(2026, 10, 19));
        let days: Vec<_> = view.weeks.into_iter().flatten().collect();
        let on = |date: NaiveDate| days.iter().find(|x| x.date == date).unwrap();

        assert!(on(d(2026, 10, 4)).tracks.is_empty());
        assert_eq!(on(d(2026, 10, 5)).tracks.len(), 1);
        assert_eq!(on(d(2026, 10, 25)).tracks.len(), 1);
        assert!(on(d(2026, 10, 26)).tracks.is_empty());
        assert_eq!(on(d(2026, 10, 21)).appointments.len(), 1);
        assert!(on(d(2026, 10, 22)).appointments.is_empty());
    }

    #[test]
    fn patients_see_only_their_own() {
        let state = state();
        assert!(tracks_on(&state, Some("PAT2"), d(2026, 10, 10)).is_empty());
        assert_eq!(tracks_on(&state, None, d(2026, 10, 10)).len(), 1);

        let doctor = User::from_doctor(&state.doctors[0]);
        assert_eq!(scope_for(&doctor), None);
        let patient = User::patient_shell("PAT1", "A", "doc_1");
        assert_eq!(scope_for(&patient), Some("PAT1"));
    }

    #[test]
    fn week_reports_completion() {
        let mut state = state();
        state.daily_logs.push(DailyLog {
            date: d(2026, 10, 19),
            medicine_id: "m1".into(),
            track_id: "t1".into(),
            timing: "08:00".into(),
            taken: true,
            taken_at: None,
        });

        let week = week_view(&state, Some("PAT1"), d(2026, 10, 21), d(2026, 10, 19), noon());
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, d(2026, 10, 18));
        let monday = &week[1];
        assert!(monday.is_today);
        assert_eq!(monday.title, "Monday, Oct 19");
        assert_eq!((monday.completed, monday.doses.len()), (1, 2));
        assert_eq!(monday.completion, Some(50));
        assert_eq!(week[3].appointments.len(), 1);
    }

    #[test]
    fn empty_day_has_no_completion() {
        let day = day_view(&AppState::default(), None, d(2026, 10, 19), d(2026, 10, 19), noon());
        assert!(day.doses.is_empty());
        assert_eq!(day.completion, None);
        assert_eq!(day.title, "Monday, October 19th, 2026");
    }

    #[test]
    fn navigation_steps() {
        let month = CalendarCursor::new(CalendarMode::Month, d(2026, 1, 31));
        assert_eq!(month.shifted(1).unwrap().date, d(2026, 2, 28));
        assert_eq!(month.shifted(-1).unwrap().date, d(2025, 12, 31));

        let week = CalendarCursor::new(CalendarMode::Week, d(2026, 10, 19));
        assert_eq!(week.shifted(1).unwrap().date, d(2026, 10, 26));
        assert_eq!(week.title(), "October 2026");

        let day = CalendarCursor::new(CalendarMode::Day, d(2026, 10, 1));
        assert_eq!(day.shifted(-1).unwrap().date, d(2026, 9, 30));
        assert_eq!(day.title(), "Thursday, October 1st, 2026");
    }

    #[test]
    fn large_offsets_jump_directly() {
        let month = CalendarCursor::new(CalendarMode::Month, d(2026, 1, 31));
        assert_eq!(month.shifted(2).unwrap().date, d(2026, 3, 31));
        assert_eq!(month.shifted(-13).unwrap().date, d(2024, 12, 31));

        let week = CalendarCursor::new(CalendarMode::Week, d(2026, 10, 19));
        assert_eq!(week.shifted(-2).unwrap().date, d(2026, 10, 5));

        let day = CalendarCursor::new(CalendarMode::Day, d(2026, 10, 19));
        assert!(day.shifted(2_000_000_000).is_none());
        assert!(month.shifted(i32::MIN).is_none());
    }

    #[test]
    fn ordinals() {
        let got: Vec<_> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23].iter().map(|n| ordinal(*n)).collect();
        assert_eq!(
            got,
            vec!["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "23rd"]
        );
    }
}
