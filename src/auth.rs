//! Patient and doctor sign-in.
//!
//! Patients sign in with the Patient ID their doctor issued, after completing
//! signup once. Doctors sign in by name and email; an unknown email creates
//! a demo doctor profile on the spot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AppState, Doctor, User, UserType};
use crate::store::{Action, Outcome, Store};

pub const DEFAULT_SPECIALIZATION: &str = "General Medicine";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid Patient ID. Please check and try again.")]
    UnknownPatientId,

    #[error("Account not fully set up. Please sign up first.")]
    ProfileIncomplete,

    #[error("Invalid password.")]
    WrongPassword,

    #[error("This Patient ID is already registered. Please log in.")]
    AlreadyRegistered,

    #[error("Invalid Patient ID. Please get a valid ID from your doctor.")]
    NotIssued,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("This action requires a {0} account")]
    WrongRole(UserType),
}

/// Signup details filled in by the patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub email: Option<String>,
    pub password: String,
    pub age: Option<u32>,
    pub emergency_contact: Option<String>,
    pub emergency_contact_name: Option<String>,
}

fn find_patient<'a>(state: &'a AppState, patient_id: &str) -> Option<&'a User> {
    state.users.iter().find(|u| u.id == patient_id && u.is_patient())
}

pub fn login_patient(store: &mut Store, patient_id: &str, password: &str) -> Result<User, AuthError> {
    let user = find_patient(store.state(), patient_id.trim())
        .ok_or(AuthError::UnknownPatientId)?
        .clone();

    if !user.is_profile_complete {
        return Err(AuthError::ProfileIncomplete);
    }
    if user.password.as_deref() != Some(password) {
        tracing::info!(patient_id = %user.id, "Patient login failed");
        return Err(AuthError::WrongPassword);
    }

    store.dispatch(Action::Login(user.clone()));
    tracing::info!(patient_id = %user.id, "Patient logged in");
    Ok(user)
}

/// Check a Patient ID before signup; returns the name the doctor registered.
pub fn check_signup(state: &AppState, patient_id: &str) -> Result<String, AuthError> {
    match find_patient(state, patient_id.trim()) {
        Some(user) if user.is_profile_complete => Err(AuthError::AlreadyRegistered),
        Some(user) => Ok(user.name.clone()),
        None => Err(AuthError::NotIssued),
    }
}

/// Complete a patient shell created by a doctor and sign the patient in.
pub fn complete_signup(
    store: &mut Store,
    patient_id: &str,
    form: SignupForm,
) -> Result<User, AuthError> {
    check_signup(store.state(), patient_id)?;
    if form.password.is_empty() {
        return Err(AuthError::MissingField("Password"));
    }

    let mut user = find_patient(store.state(), patient_id.trim())
        .ok_or(AuthError::NotIssued)?
        .clone();
    if !form.name.trim().is_empty() {
        user.name = form.name.trim().to_string();
    }
    user.email = non_blank(form.email).or(user.email);
    user.password = Some(form.password);
    user.age = form.age.or(user.age);
    user.emergency_contact = non_blank(form.emergency_contact).or(user.emergency_contact);
    user.emergency_contact_name =
        non_blank(form.emergency_contact_name).or(user.emergency_contact_name);
    user.is_profile_complete = true;

    store.dispatch(Action::UpdateUser(user.clone()));
    store.dispatch(Action::Login(user.clone()));
    tracing::info!(patient_id = %user.id, "Patient signup completed");
    Ok(user)
}

/// Sign a doctor in by email, creating a demo profile for new emails.
///
/// An existing doctor's name is refreshed on the session copy only; the
/// doctor record keeps the registered name.
pub fn login_doctor(
    store: &mut Store,
    name: &str,
    email: &str,
    now: DateTime<Utc>,
) -> Result<User, AuthError> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() {
        return Err(AuthError::MissingField("Name"));
    }
    if email.is_empty() {
        return Err(AuthError::MissingField("Email"));
    }

    let doctor = match store.state().find_doctor_by_email(email) {
        Some(existing) => {
            let mut doctor = existing.clone();
            if doctor.name != name {
                doctor.name = name.to_string();
            }
            doctor
        }
        None => {
            let stamp = now.timestamp_millis();
            let doctor = Doctor {
                id: format!("doc_{stamp}"),
                name: name.to_string(),
                email: email.to_string(),
                specialization: DEFAULT_SPECIALIZATION.to_string(),
                patients: Vec::new(),
                license_number: format!("DEMO-{stamp}"),
            };
            if let Outcome::Rejected(reason) = store.dispatch(Action::AddDoctor(doctor.clone())) {
                tracing::warn!(reason = %reason, "Doctor profile not created");
            } else {
                tracing::info!(doctor_id = %doctor.id, "Doctor profile created");
            }
            doctor
        }
    };

    let user = User::from_doctor(&doctor);
    store.dispatch(Action::Login(user.clone()));
    tracing::info!(doctor_id = %user.id, "Doctor logged in");
    Ok(user)
}

pub fn logout(store: &mut Store) {
    if let Some(user) = &store.state().user {
        tracing::info!(user_id = %user.id, "Logged out");
    }
    store.dispatch(Action::Logout);
}

pub fn current_user(state: &AppState) -> Result<&User, AuthError> {
    match &state.user {
        Some(user) if state.is_authenticated => Ok(user),
        _ => Err(AuthError::NotAuthenticated),
    }
}

pub fn require_patient(state: &AppState) -> Result<&User, AuthError> {
    let user = current_user(state)?;
    if user.is_patient() {
        Ok(user)
    } else {
        Err(AuthError::WrongRole(UserType::Patient))
    }
}

pub fn require_doctor(state: &AppState) -> Result<&User, AuthError> {
    let user = current_user(state)?;
    if user.is_doctor() {
        Ok(user)
    } else {
        Err(AuthError::WrongRole(UserType::Doctor))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
