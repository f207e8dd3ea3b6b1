//! Display strings for English and Hindi.
//!
//! Keys are dotted paths (`"status.overdue"`); group names alone are not
//! keys. A missing key in the selected language falls back to English, then
//! to the key itself.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::DEFAULT_LANGUAGE;

pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "hi"];

static EN: &[(&str, &str)] = &[
    // Navigation
    ("home", "Home"),
    ("calendar", "Calendar"),
    ("tracks", "Tracks"),
    ("addTrack", "New Prescription"),
    ("chat", "AI Chat"),
    ("settings", "Settings"),
    ("logout", "Logout"),

    // Dashboard
    ("goodMorning", "Good morning"),
    ("welcomeBack", "Welcome back"),
    ("doctorDashboard", "Doctor Dashboard"),
    ("todayIs", "Today is"),
    ("activeTracks", "Active Tracks"),
    ("todaysProgress", "Today's Progress"),
    ("totalMedicines", "Total Medicines"),
    ("overallCompletion", "Overall Completion"),
    ("todaysMedications", "Today's Medications"),

    // Doctor dashboard
    ("totalPatients", "Total Patients"),
    ("underYourCare", "Under your care"),
    ("activePrescriptions", "Active Prescriptions"),
    ("currentlyPrescribed", "Currently prescribed"),
    ("recentAlerts", "Recent Alerts"),
    ("last24h", "Last 24 hours"),
    ("avgCompliance", "Avg. Compliance"),
    ("patientAdherence", "Patient adherence"),
    ("recentHealthAlerts", "Recent Health Alerts"),
    ("patientRedFlags", "Patient red flags requiring attention"),
    ("dailyCheckinAlert", "Daily Check-in Alert"),
    ("aiChatAlert", "AI Chat Alert"),
    ("patientMessage", "Patient message"),

    // Settings
    ("managePreferences", "Manage your account and preferences"),
    ("profileInfo", "Profile Information"),
    ("name", "Name"),
    ("assignedDoctor", "Assigned Doctor"),
    ("appearance", "Appearance"),
    ("darkMode", "Dark Mode"),
    ("themeSwitch", "Switch between light and dark themes"),
    ("language", "Language"),
    ("notifications", "Notifications"),
    ("checkinReminders", "Daily Check-in Reminders"),
    ("checkinRemindersDesc", "Get reminded to complete your daily health check-in"),
    ("privacySharing", "Privacy & Sharing"),
    ("generateShareableLink", "Generate Shareable Link"),
    ("generateShareableLinkDesc", "Create a secure link to share your health data"),
    ("generateLink", "Generate Link"),

    // Auth
    ("welcome", "Welcome to Arogya Sahayak"),
    ("keepHealthOnTrack", "Keep your health on track"),
    ("signIn", "Sign In"),
    ("signUp", "Sign Up"),
    ("createAccount", "Create Account"),
    ("emailAddress", "Email Address"),
    ("password", "Password"),
    ("fullName", "Full Name"),
    ("age", "Age"),
    ("emergencyContact", "Emergency Contact"),

    // Common
    ("save", "Save"),
    ("cancel", "Cancel"),
    ("delete", "Delete"),
    ("edit", "Edit"),
    ("add", "Add"),
    ("remove", "Remove"),
    ("submit", "Submit"),
    ("back", "Back"),
    ("next", "Next"),

    // Medical
    ("medicine", "Medicine"),
    ("dosage", "Dosage"),
    ("frequency", "Frequency"),
    ("timing", "Timing"),
    ("condition", "Condition"),
    ("symptoms", "Symptoms"),
    ("mood", "Mood"),
    ("redFlags", "Red flags"),

    // Time
    ("morning", "Morning"),
    ("afternoon", "Afternoon"),
    ("evening", "Evening"),
    ("night", "Night"),
    ("daily", "Daily"),
    ("weekly", "Weekly"),
    ("monthly", "Monthly"),

    ("checkIn.title", "Daily Health Check-in"),
    ("checkIn.question", "How are you feeling today?"),
    ("checkIn.moodPrompt", "How's your mood today?"),
    ("checkIn.symptomsPrompt", "Any symptoms today?"),
    ("checkIn.notesPrompt", "Additional notes"),
    ("checkIn.skip", "Skip for today"),
    ("checkIn.redFlagNotice", "Your doctor has been notified about concerning symptoms."),

    ("status.taken", "Taken"),
    ("status.upcoming", "Upcoming"),
    ("status.due", "Due now"),
    ("status.overdue", "Overdue"),

    ("share.title", "Shared Health Summary"),
    ("share.accessCode", "Access Code"),
    ("share.invalidCode", "Invalid access code"),
    ("share.expired", "This link has expired"),
    ("share.notFound", "Shared link not found"),
];

static HI: &[(&str, &str)] = &[
    ("home", "होम"),
    ("calendar", "कैलेंडर"),
    ("tracks", "ट्रैक्स"),
    ("addTrack", "नया नुस्खा"),
    ("chat", "एआई चैट"),
    ("settings", "सेटिंग्स"),
    ("logout", "लॉगआउट"),

    ("goodMorning", "सुप्रभात"),
    ("welcomeBack", "वापसी पर स्वागत है"),
    ("doctorDashboard", "डॉक्टर डैशबोर्ड"),
    ("todayIs", "आज है"),
    ("activeTracks", "सक्रिय ट्रैक्स"),
    ("todaysProgress", "आज की प्रगति"),
    ("totalMedicines", "कुल दवाएं"),
    ("overallCompletion", "समग्र पूर्णता"),
    ("todaysMedications", "आज की दवाएं"),

    ("totalPatients", "कुल मरीज़"),
    ("underYourCare", "आपकी देखरेख में"),
    ("activePrescriptions", "सक्रिय नुस्खे"),
    ("currentlyPrescribed", "वर्तमान में निर्धारित"),
    ("recentAlerts", "हाल के अलर्ट"),
    ("last24h", "पिछले 24 घंटे"),
    ("avgCompliance", "औसत अनुपालन"),
    ("patientAdherence", "रोगी पालन"),
    ("recentHealthAlerts", "हाल के स्वास्थ्य अलर्ट"),
    ("patientRedFlags", "ध्यान देने योग्य रोगी रेड फ्लैग"),
    ("dailyCheckinAlert", "दैनिक चेक-इन अलर्ट"),
    ("aiChatAlert", "एआई चैट अलर्ट"),
    ("patientMessage", "रोगी का संदेश"),

    ("managePreferences", "अपना खाता और प्राथमिकताएं प्रबंधित करें"),
    ("profileInfo", "प्रोफ़ाइल जानकारी"),
    ("name", "नाम"),
    ("assignedDoctor", "नियुक्त चिकित्सक"),
    ("appearance", "दिखावट"),
    ("darkMode", "डार्क मोड"),
    ("themeSwitch", "लाइट और डार्क थीम के बीच स्विच करें"),
    ("language", "भाषा"),
    ("notifications", "सूचनाएं"),
    ("checkinReminders", "दैनिक चेक-इन अनुस्मारक"),
    ("checkinRemindersDesc", "अपना दैनिक स्वास्थ्य चेक-इन पूरा करने के लिए अनुस्मारक प्राप्त करें"),
    ("privacySharing", "गोपनीयता और साझाकरण"),
    ("generateShareableLink", "साझा करने योग्य लिंक बनाएं"),
    ("generateShareableLinkDesc", "अपना स्वास्थ्य डेटा साझा करने के लिए एक सुरक्षित लिंक बनाएं"),
    ("generateLink", "लिंक बनाएं"),

    ("welcome", "आरोग्य सहायक में आपका स्वागत है"),
    ("keepHealthOnTrack", "अपने स्वास्थ्य को ट्रैक पर रखें"),
    ("signIn", "साइन इन"),
    ("signUp", "साइन अप"),
    ("createAccount", "खाता बनाएं"),
    ("emailAddress", "ईमेल पता"),
    ("password", "पासवर्ड"),
    ("fullName", "पूरा नाम"),
    ("age", "उम्र"),
    ("emergencyContact", "आपातकालीन संपर्क"),

    ("save", "सेव करें"),
    ("cancel", "रद्द करें"),
    ("delete", "हटाएं"),
    ("edit", "संपादित करें"),
    ("add", "जोड़ें"),
    ("remove", "हटाएं"),
    ("submit", "जमा करें"),
    ("back", "वापस"),
    ("next", "अगला"),

    ("medicine", "दवा"),
    ("dosage", "खुराक"),
    ("frequency", "आवृत्ति"),
    ("timing", "समय"),
    ("condition", "स्थिति"),
    ("symptoms", "लक्षण"),
    ("mood", "मूड"),
    ("redFlags", "रेड फ्लैग"),

    ("morning", "सुबह"),
    ("afternoon", "दोपहर"),
    ("evening", "शाम"),
    ("night", "रात"),
    ("daily", "दैनिक"),
    ("weekly", "साप्ताहिक"),
    ("monthly", "मासिक"),

    ("checkIn.title", "दैनिक स्वास्थ्य चेक-इन"),
    ("checkIn.question", "आज आप कैसा महसूस कर रहे हैं?"),
    ("checkIn.moodPrompt", "आज आपका मूड कैसा है?"),
    ("checkIn.symptomsPrompt", "आज कोई लक्षण?"),
    ("checkIn.skip", "आज के लिए छोड़ें"),

    ("status.taken", "ली गई"),
    ("status.upcoming", "आगामी"),
    ("status.due", "अभी लेनी है"),
    ("status.overdue", "समय निकल गया"),

    ("share.accessCode", "एक्सेस कोड"),
    ("share.invalidCode", "अमान्य एक्सेस कोड"),
];

static TRANSLATIONS: LazyLock<HashMap<&'static str, HashMap<&'static str, &'static str>>> =
    LazyLock::new(|| {
        HashMap::from([
            ("en", EN.iter().copied().collect()),
            ("hi", HI.iter().copied().collect()),
        ])
    });

/// Translate `key` into `language`.
pub fn t(key: &str, language: &str) -> String {
    lookup(language, key)
        .or_else(|| lookup(DEFAULT_LANGUAGE, key))
        .unwrap_or(key)
        .to_string()
}

pub fn is_supported(language: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language)
}

/// Non-empty string stored under the full dotted key.
fn lookup(language: &str, key: &str) -> Option<&'static str> {
    TRANSLATIONS
        .get(language)?
        .get(key)
        .copied()
        .filter(|s| !s.is_empty())
}
