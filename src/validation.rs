// Completeness gate for reviewer submissions.
// A review is only appended to the ledger once it passes these checks.

use thiserror::Error;

use crate::models::{CorrectnessRating, RelevanceRating, ReviewSubmission};

/// Why a submission cannot be saved yet. Messages are shown to the reviewer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please add a comment before saving the review.")]
    MissingComment,

    #[error("Select at least one relevant symptom, or confirm that no symptom is relevant.")]
    NoRelevantSymptomChoice,
}

/// Ratings come from fixed selectors with defaults and never fail a
/// submission on their own.
pub fn is_submission_complete(
    relevance: RelevanceRating,
    correctness: CorrectnessRating,
    comment: Option<&str>,
    relevant_symptoms: &[String],
    none_relevant: bool,
) -> bool {
    check_submission(relevance, correctness, comment, relevant_symptoms, none_relevant).is_ok()
}

/// Validate a submission, reporting the first missing piece.
pub fn validate_submission(submission: &ReviewSubmission) -> Result<(), ValidationError> {
    check_submission(
        submission.relevance,
        submission.correctness,
        submission.comment.as_deref(),
        &submission.relevant_symptoms,
        submission.none_relevant,
    )
}

fn check_submission(
    _relevance: RelevanceRating,
    _correctness: CorrectnessRating,
    comment: Option<&str>,
    relevant_symptoms: &[String],
    none_relevant: bool,
) -> Result<(), ValidationError> {
    if comment.map_or(true, |c| c.trim().is_empty()) {
        return Err(ValidationError::MissingComment);
    }
    if relevant_symptoms.is_empty() && !none_relevant {
        return Err(ValidationError::NoRelevantSymptomChoice);
    }
    Ok(())
}
