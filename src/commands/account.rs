//! Sign-in, signup and sign-out commands.

use serde::Serialize;

use crate::auth::{self, SignupForm};
use crate::core_state::CoreState;
use crate::models::User;

use super::Clock;

pub fn doctor_login(core: &mut CoreState, name: &str, email: &str, clock: &Clock) -> Result<User, String> {
    auth::login_doctor(core.store_mut(), name, email, clock.utc()).map_err(|e| e.to_string())
}

pub fn login(core: &mut CoreState, patient_id: &str, password: &str) -> Result<User, String> {
    auth::login_patient(core.store_mut(), patient_id, password).map_err(|e| e.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupStatus {
    pub patient_id: String,
    pub name: String,
}

pub fn check_signup(core: &CoreState, patient_id: &str) -> Result<SignupStatus, String> {
    let name = auth::check_signup(core.store().state(), patient_id).map_err(|e| e.to_string())?;
    Ok(SignupStatus {
        patient_id: patient_id.trim().to_string(),
        name,
    })
}

pub fn signup(core: &mut CoreState, patient_id: &str, form: SignupForm) -> Result<User, String> {
    auth::complete_signup(core.store_mut(), patient_id, form).map_err(|e| e.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedOut {
    pub is_authenticated: bool,
}

pub fn logout(core: &mut CoreState) -> Result<LoggedOut, String> {
    auth::logout(core.store_mut());
    Ok(LoggedOut {
        is_authenticated: core.store().state().is_authenticated,
    })
}
