//! Command-line surface: one subcommand per user flow.
//!
//! Every command returns `Result<T, String>` with a serializable `T`; the
//! runner prints it as JSON on stdout. Errors become their display message.

pub mod account;
pub mod patient;
pub mod practice;
pub mod settings;

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config;
use crate::core_state::CoreState;
use crate::models::CalendarMode;

#[derive(Debug, Parser)]
#[command(name = "arogya")]
#[command(version = config::APP_VERSION)]
#[command(about = "Arogya Sahayak: medication tracking, daily check-ins and an AI health assistant", long_about = None)]
pub struct Cli {
    /// Directory holding the saved data (default: ~/ArogyaSahayak)
    #[arg(long, global = true, env = config::DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in as a doctor; a new email creates a demo profile
    DoctorLogin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },

    /// Sign in as a patient with the Patient ID from your doctor
    Login {
        patient_id: String,
        #[arg(long)]
        password: String,
    },

    /// Complete a patient account created by a doctor
    Signup {
        patient_id: String,
        /// Only check that the Patient ID can be signed up
        #[arg(long)]
        check: bool,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        /// Emergency contact phone number
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        contact_name: Option<String>,
    },

    /// Sign out
    Logout,

    /// Register a patient (doctor)
    AddPatient {
        #[arg(long)]
        name: String,
        /// Patient ID to hand out; generated when omitted
        #[arg(long)]
        id: Option<String>,
    },

    /// List your patients (doctor)
    Patients {
        /// Filter by name or Patient ID
        #[arg(long)]
        search: Option<String>,
    },

    /// Create a prescription track (doctor)
    Prescribe {
        #[arg(long)]
        patient: String,
        #[arg(long)]
        condition: String,
        /// First day, YYYY-MM-DD (default: today)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day, YYYY-MM-DD (default: open-ended)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// NAME|DOSAGE|FREQUENCY|HH:MM,HH:MM[|INSTRUCTIONS]; repeat per medicine
        #[arg(long = "medicine", required = true)]
        medicines: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Activate, deactivate or rate a track (doctor)
    UpdateTrack {
        id: String,
        #[arg(long)]
        active: Option<bool>,
        /// Completion rate, 0-100
        #[arg(long)]
        completion: Option<f64>,
    },

    /// Delete a track (doctor)
    DeleteTrack { id: String },

    /// Schedule an appointment (doctor)
    Appointment {
        #[arg(long)]
        patient: String,
        #[arg(long, default_value = crate::practice::DEFAULT_APPOINTMENT_TITLE)]
        title: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        time: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Your appointments, soonest first
    Appointments,

    /// Today's doses (patient)
    Today,

    /// Mark one of today's doses taken, or untaken if it already was (patient)
    Take { medicine_id: String, timing: String },

    /// Adherence summary (patient)
    Stats,

    /// Practice overview with red-flag alerts (doctor)
    Dashboard,

    /// Medication tracks you can see
    Tracks,

    /// Record today's mood and symptoms (patient)
    CheckIn {
        /// 1-10
        #[arg(long, default_value_t = crate::check_in::DEFAULT_MOOD)]
        mood: u8,
        /// Repeat per symptom
        #[arg(long = "symptom")]
        symptoms: Vec<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Mood labels and common symptoms for the check-in form
    CheckInOptions,

    /// Do not ask for a check-in again this session (patient)
    SkipCheckIn,

    /// Ask the AI health assistant
    Chat {
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },

    /// Your conversation with the assistant
    History,

    /// Month, week or day schedule
    Calendar {
        #[arg(long, default_value = "month")]
        mode: CalendarMode,
        /// Anchor date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Steps forward (positive) or back (negative) from the anchor
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },

    /// Create a read-only share link (patient)
    Share {
        #[arg(long)]
        no_tracks: bool,
        #[arg(long)]
        no_progress: bool,
        /// Link lifetime in hours (default: no expiry)
        #[arg(long)]
        hours: Option<i64>,
    },

    /// Open a share link with its access code
    OpenShare { link_id: String, code: String },

    /// Toggle between light and dark theme
    Theme,

    /// Turn the daily check-in reminder on or off
    Reminders {
        #[arg(long, conflicts_with = "off", required_unless_present = "off")]
        on: bool,
        #[arg(long)]
        off: bool,
    },

    /// Set the interface language (en, hi)
    Language { code: String },

    /// Look up a translated string
    Translate {
        key: String,
        /// Language (default: the saved one)
        #[arg(long)]
        lang: Option<String>,
    },

    /// Dispatch a raw JSON action, e.g. '{"type":"TOGGLE_THEME"}'
    Dispatch { action: String },

    /// Merge an exported snapshot file into the saved data
    Import { path: PathBuf },

    /// Print the whole saved state
    Show,
}

/// Wall-clock source for commands; fixed in tests.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    now: DateTime<Local>,
}

impl Clock {
    pub fn system() -> Self {
        Self { now: Local::now() }
    }

    pub fn fixed(now: DateTime<Local>) -> Self {
        Self { now }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn time(&self) -> NaiveTime {
        self.now.time()
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }
}

fn json<T: Serialize>(value: Result<T, String>) -> Result<serde_json::Value, String> {
    serde_json::to_value(value?).map_err(|e| e.to_string())
}

/// Run one command against the core state.
pub fn execute(core: &mut CoreState, command: Command, clock: &Clock) -> Result<serde_json::Value, String> {
    match command {
        Command::DoctorLogin { name, email } => json(account::doctor_login(core, &name, &email, clock)),
        Command::Login {
            patient_id,
            password,
        } => json(account::login(core, &patient_id, &password)),
        Command::Signup {
            patient_id,
            check,
            password,
            name,
            email,
            age,
            contact,
            contact_name,
        } => {
            if check {
                json(account::check_signup(core, &patient_id))
            } else {
                let form = crate::auth::SignupForm {
                    name: name.unwrap_or_default(),
                    email,
                    password: password.unwrap_or_default(),
                    age,
                    emergency_contact: contact,
                    emergency_contact_name: contact_name,
                };
                json(account::signup(core, &patient_id, form))
            }
        }
        Command::Logout => json(account::logout(core)),
        Command::AddPatient { name, id } => json(practice::add_patient(core, &name, id.as_deref())),
        Command::Patients { search } => json(practice::patients(core, search.as_deref())),
        Command::Prescribe {
            patient,
            condition,
            start,
            end,
            medicines,
            notes,
        } => json(practice::prescribe(
            core,
            practice::PrescribeArgs {
                patient,
                condition,
                start: start.unwrap_or_else(|| clock.today()),
                end,
                medicines,
                notes,
            },
        )),
        Command::UpdateTrack {
            id,
            active,
            completion,
        } => json(practice::update_track(core, &id, active, completion)),
        Command::DeleteTrack { id } => json(practice::delete_track(core, &id)),
        Command::Appointment {
            patient,
            title,
            date,
            time,
            notes,
        } => json(practice::appointment(core, &patient, &title, &date, &time, notes.as_deref())),
        Command::Appointments => json(practice::appointments(core)),
        Command::Dashboard => json(practice::dashboard(core)),
        Command::Tracks => json(practice::tracks(core)),
        Command::Today => json(patient::today(core, clock)),
        Command::Take {
            medicine_id,
            timing,
        } => json(patient::take(core, &medicine_id, &timing, clock)),
        Command::Stats => json(patient::stats(core, clock)),
        Command::CheckIn {
            mood,
            symptoms,
            notes,
        } => json(patient::check_in(
            core,
            crate::check_in::CheckInForm {
                mood,
                symptoms,
                notes,
            },
            clock,
        )),
        Command::CheckInOptions => json(patient::check_in_options()),
        Command::SkipCheckIn => json(patient::skip_check_in(core)),
        Command::Chat { message } => json(patient::chat(core, &message.join(" "), clock)),
        Command::History => json(patient::history(core)),
        Command::Calendar { mode, date, offset } => {
            json(patient::calendar(core, mode, date.unwrap_or_else(|| clock.today()), offset, clock))
        }
        Command::Share {
            no_tracks,
            no_progress,
            hours,
        } => json(patient::share(core, !no_tracks, !no_progress, hours, clock)),
        Command::OpenShare { link_id, code } => json(patient::open_share(core, &link_id, &code, clock)),
        Command::Theme => json(settings::toggle_theme(core)),
        Command::Reminders { on, .. } => json(settings::set_reminders(core, on)),
        Command::Language { code } => json(settings::set_language(core, &code)),
        Command::Translate { key, lang } => json(settings::translate(core, &key, lang.as_deref())),
        Command::Dispatch { action } => json(settings::dispatch(core, &action)),
        Command::Import { path } => json(settings::import(core, &path)),
        Command::Show => json(settings::show(core)),
    }
}
