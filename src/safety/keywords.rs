//! Red-flag phrase detection on patient-written text.

/// Clinical phrases that mark a message as a red flag.
pub static RED_FLAG_KEYWORDS: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "severe headache",
    "sudden weakness",
    "unconscious",
    "seizure",
    "severe bleeding",
    "high fever",
    "suicidal",
    "can't breathe",
    "heart attack",
    "stroke",
    "overdose",
    "severe pain",
    "allergic reaction",
    "swelling face",
    "difficulty swallowing",
    "confusion",
    "vomiting blood",
    "severe abdominal pain",
    "loss of consciousness",
];

/// Strategy for finding red-flag triggers in free text.
pub trait RedFlagClassifier {
    /// Triggers found in `text`, in the classifier's own order.
    fn triggers(&self, text: &str) -> Vec<String>;
}

/// Case-insensitive substring match against a fixed phrase list.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: &'static [&'static str],
}

impl KeywordClassifier {
    pub fn new(keywords: &'static [&'static str]) -> Self {
        Self { keywords }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(RED_FLAG_KEYWORDS)
    }
}

impl RedFlagClassifier for KeywordClassifier {
    fn triggers(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|kw| lower.contains(&kw.to_lowercase()))
            .map(|kw| kw.to_string())
            .collect()
    }
}
