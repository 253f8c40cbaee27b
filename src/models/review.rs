use serde::{Deserialize, Serialize};

use super::enums::{CorrectnessRating, RelevanceRating};

/// Ledger text recorded when the reviewer asserts that none of the asked
/// symptoms were relevant.
pub const NO_RELEVANT_SYMPTOM: &str = "No symptom is relevant";

/// Separator between symptom names inside a single ledger field.
pub const SYMPTOM_SEPARATOR: &str = "|";

/// Symptoms the reviewer marked as relevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "symptoms", rename_all = "snake_case")]
pub enum RelevantSymptoms {
    Selected(Vec<String>),
    NoneRelevant,
}

impl RelevantSymptoms {
    pub fn names(&self) -> &[String] {
        match self {
            Self::Selected(names) => names,
            Self::NoneRelevant => &[],
        }
    }

    pub fn to_field(&self) -> String {
        match self {
            Self::Selected(names) => join_symptoms(names),
            Self::NoneRelevant => NO_RELEVANT_SYMPTOM.to_string(),
        }
    }

    pub fn from_field(field: &str) -> Self {
        if field == NO_RELEVANT_SYMPTOM {
            Self::NoneRelevant
        } else {
            Self::Selected(split_symptoms(field))
        }
    }
}

/// One completed review, exactly as appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub case_id: String,
    pub relevance: RelevanceRating,
    pub correctness: CorrectnessRating,
    pub relevant_symptoms: RelevantSymptoms,
    pub irrelevant_symptoms: Vec<String>,
    pub comment: String,
}

/// What the reviewer filled in before pressing save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewSubmission {
    #[serde(default)]
    pub relevance: RelevanceRating,
    #[serde(default)]
    pub correctness: CorrectnessRating,
    #[serde(default)]
    pub relevant_symptoms: Vec<String>,
    #[serde(default)]
    pub none_relevant: bool,
    pub comment: Option<String>,
}

pub fn join_symptoms(names: &[String]) -> String {
    names.join(SYMPTOM_SEPARATOR)
}

pub fn split_symptoms(field: &str) -> Vec<String> {
    field
        .split(SYMPTOM_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
