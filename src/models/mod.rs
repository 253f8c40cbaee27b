pub mod conversation;
pub mod enums;
pub mod review;
pub mod symptom;

pub use conversation::Turn;
pub use enums::{CorrectnessRating, LookaheadMode, RelevanceRating, SymptomStatus, TurnRole};
pub use review::{RelevantSymptoms, ReviewRecord, ReviewSubmission, NO_RELEVANT_SYMPTOM};
pub use symptom::{AskedSymptom, PatientProfile, ProfileExtraction};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value:?}")]
    InvalidEnum { field: String, value: String },
}
