//! Doctor-side commands: patients, prescriptions, appointments and the
//! practice dashboard.

use chrono::NaiveDate;
use serde::Serialize;

use crate::adherence::{self, DoctorDashboard, TrackView};
use crate::auth;
use crate::core_state::CoreState;
use crate::models::{Appointment, MedicineTrack, User};
use crate::practice::{self as flows, MedicineInput, PatientSummary, TrackInput};

pub fn add_patient(core: &mut CoreState, name: &str, patient_id: Option<&str>) -> Result<User, String> {
    let doctor_id = doctor_id(core)?;
    flows::register_patient(core.store_mut(), &doctor_id, name, patient_id).map_err(|e| e.to_string())
}

pub fn patients(core: &CoreState, search: Option<&str>) -> Result<Vec<PatientSummary>, String> {
    let doctor_id = doctor_id(core)?;
    Ok(flows::list_patients(core.store().state(), &doctor_id, search))
}

#[derive(Debug, Clone)]
pub struct PrescribeArgs {
    pub patient: String,
    pub condition: String,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    /// `NAME|DOSAGE|FREQUENCY|HH:MM,HH:MM[|INSTRUCTIONS]`
    pub medicines: Vec<String>,
    pub notes: Option<String>,
}

pub fn prescribe(core: &mut CoreState, args: PrescribeArgs) -> Result<MedicineTrack, String> {
    let doctor_id = doctor_id(core)?;
    let medicines = args
        .medicines
        .iter()
        .map(|spec| parse_medicine(spec))
        .collect::<Result<Vec<_>, _>>()?;
    let input = TrackInput {
        patient_id: args.patient,
        condition: args.condition,
        start_date: args.start,
        end_date: args.end,
        medicines,
        notes: args.notes,
    };
    flows::create_track(core.store_mut(), &doctor_id, input).map_err(|e| e.to_string())
}

/// Parse `NAME|DOSAGE|FREQUENCY|TIMINGS[|INSTRUCTIONS]`, timings comma-separated.
pub fn parse_medicine(spec: &str) -> Result<MedicineInput, String> {
    let parts: Vec<&str> = spec.split('|').map(str::trim).collect();
    if !(4..=5).contains(&parts.len()) {
        return Err(format!(
            "Invalid medicine \"{spec}\": expected NAME|DOSAGE|FREQUENCY|HH:MM,HH:MM[|INSTRUCTIONS]"
        ));
    }
    Ok(MedicineInput {
        name: parts[0].to_string(),
        dosage: parts[1].to_string(),
        frequency: parts[2].to_string(),
        timings: parts[3].split(',').map(|t| t.trim().to_string()).collect(),
        instructions: parts.get(4).filter(|s| !s.is_empty()).map(|s| s.to_string()),
    })
}

pub fn update_track(
    core: &mut CoreState,
    track_id: &str,
    is_active: Option<bool>,
    completion_rate: Option<f64>,
) -> Result<MedicineTrack, String> {
    doctor_id(core)?;
    flows::update_track(core.store_mut(), track_id, is_active, completion_rate).map_err(|e| e.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted {
    pub id: String,
}

pub fn delete_track(core: &mut CoreState, track_id: &str) -> Result<Deleted, String> {
    doctor_id(core)?;
    flows::delete_track(core.store_mut(), track_id).map_err(|e| e.to_string())?;
    Ok(Deleted {
        id: track_id.to_string(),
    })
}

pub fn appointment(
    core: &mut CoreState,
    patient_id: &str,
    title: &str,
    date: &str,
    time: &str,
    notes: Option<&str>,
) -> Result<Appointment, String> {
    let doctor_id = doctor_id(core)?;
    flows::schedule_appointment(core.store_mut(), &doctor_id, patient_id, title, date, time, notes)
        .map_err(|e| e.to_string())
}

pub fn appointments(core: &CoreState) -> Result<Vec<Appointment>, String> {
    let state = core.store().state();
    let user = auth::current_user(state).map_err(|e| e.to_string())?;
    Ok(flows::appointments_for(state, user))
}

pub fn dashboard(core: &CoreState) -> Result<DoctorDashboard, String> {
    let doctor_id = doctor_id(core)?;
    Ok(adherence::doctor_dashboard(core.store().state(), &doctor_id))
}

pub fn tracks(core: &CoreState) -> Result<Vec<TrackView>, String> {
    let state = core.store().state();
    let user = auth::current_user(state).map_err(|e| e.to_string())?;
    Ok(adherence::visible_tracks(state, user))
}

fn doctor_id(core: &CoreState) -> Result<String, String> {
    auth::require_doctor(core.store().state())
        .map(|u| u.id.clone())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::super::tests::{clock, core};
    use super::*;
    use crate::commands::account;

    #[test]
    fn parse_medicine_spec() {
        let m = parse_medicine("Metformin | 500mg | Twice daily | 08:00, 20:00 | With food").unwrap();
        assert_eq!(m.name, "Metformin");
        assert_eq!(m.timings, vec!["08:00", "20:00"]);
        assert_eq!(m.instructions.as_deref(), Some("With food"));

        let m = parse_medicine("Aspirin|75mg|Once daily|09:00").unwrap();
        assert!(m.instructions.is_none());

        assert!(parse_medicine("Aspirin|75mg").is_err());
    }

    #[test]
    fn patient_commands_need_a_doctor() {
        let mut core = core();
        assert_eq!(add_patient(&mut core, "Asha", None).unwrap_err(), "Not signed in");
    }

    #[test]
    fn register_and_search() {
        let mut core = core();
        account::doctor_login(&mut core, "Emily Carter", "emily.carter@clinic.com", &clock()).unwrap();
        add_patient(&mut core, "Asha Rao", Some("PAT111111")).unwrap();
        add_patient(&mut core, "Vikram", Some("PAT222222")).unwrap();

        let found = patients(&core, Some("asha")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "PAT111111");
        assert!(!found[0].is_registered);

        let dash = dashboard(&core).unwrap();
        assert_eq!(dash.total_patients, 2);
        assert_eq!(dash.average_compliance, None);
    }
}
