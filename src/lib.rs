pub mod adherence; // Today's doses, stats, doctor dashboard
pub mod ai; // Chat assistant gateway
pub mod auth; // Patient and doctor sign-in
pub mod calendar; // Month, week and day views
pub mod chat; // Two-phase chat exchange
pub mod check_in; // Daily mood and symptom check-in
pub mod commands;
pub mod config;
pub mod core_state;
pub mod i18n;
pub mod models;
pub mod practice; // Patients, prescriptions, appointments
pub mod safety; // Red-flag keywords and emergency alerts
pub mod share; // Read-only share links
pub mod store;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::{Cli, Clock};
use crate::config::AiConfig;
use crate::core_state::CoreState;

pub fn run() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let data_dir = cli.data_dir.clone().unwrap_or_else(config::app_data_dir);
    let mut core = CoreState::open(&data_dir, &AiConfig::from_env());

    match commands::execute(&mut core, cli.command, &Clock::system()) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
