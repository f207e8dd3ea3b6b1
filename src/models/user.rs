use serde::{Deserialize, Serialize};

use super::enums::UserType;

/// Identity record shared by patients and doctors.
///
/// For patients `id` is the Patient ID handed out by their doctor; for doctors
/// it is the generated doctor id. Both live in the same id space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Emergency contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_doctor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub is_profile_complete: bool,
}

impl User {
    /// Patient record created by a doctor before the patient signs up.
    pub fn patient_shell(id: &str, name: &str, doctor_id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
            password: None,
            age: None,
            emergency_contact: None,
            emergency_contact_name: None,
            user_type: UserType::Patient,
            assigned_doctor: Some(doctor_id.to_string()),
            language: None,
            is_profile_complete: false,
        }
    }

    /// Session user for a logged-in doctor.
    pub fn from_doctor(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.clone(),
            name: doctor.name.clone(),
            email: Some(doctor.email.clone()),
            password: None,
            age: None,
            emergency_contact: None,
            emergency_contact_name: None,
            user_type: UserType::Doctor,
            assigned_doctor: None,
            language: None,
            is_profile_complete: true,
        }
    }

    pub fn is_patient(&self) -> bool {
        self.user_type == UserType::Patient
    }

    pub fn is_doctor(&self) -> bool {
        self.user_type == UserType::Doctor
    }

    /// Registered emergency contact, if the user gave a number.
    pub fn emergency_contact(&self) -> Option<EmergencyContact> {
        let number = self.emergency_contact.as_deref()?.trim();
        if number.is_empty() {
            return None;
        }
        Some(EmergencyContact {
            name: self
                .emergency_contact_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Emergency Contact".to_string()),
            number: number.to_string(),
        })
    }
}

/// Who gets paged when a red flag is raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub specialization: String,
    /// Patient ids under this doctor's care, in registration order.
    #[serde(default)]
    pub patients: Vec<String>,
    pub license_number: String,
}
