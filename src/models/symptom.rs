use serde::{Deserialize, Serialize};

use super::enums::SymptomStatus;

/// Patient attributes recovered from the opening user turn.
pub type PatientProfile = serde_json::Map<String, serde_json::Value>;

/// A symptom the interviewer was instructed to ask about, with the
/// patient's answer resolved to a status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AskedSymptom {
    pub symptom: String,
    pub status: SymptomStatus,
}

impl AskedSymptom {
    pub fn new(symptom: impl Into<String>, status: SymptomStatus) -> Self {
        Self {
            symptom: symptom.into(),
            status,
        }
    }
}

/// Profile and initial symptoms found in the same user turn.
/// Both are `None` when no turn carries the opening statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileExtraction {
    pub profile: Option<PatientProfile>,
    pub initial_symptoms: Option<Vec<String>>,
}

impl ProfileExtraction {
    pub fn is_found(&self) -> bool {
        self.profile.is_some() || self.initial_symptoms.is_some()
    }
}
