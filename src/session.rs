//! Review session: explicit state for one reviewer working one case file.
//!
//! Everything the reviewer sees is recomputed from this state on demand:
//! the case labels, the selected case, and the parsed view of its
//! transcript. Submitting a review validates it, appends it to the ledger,
//! marks the case reviewed and advances to the next unreviewed case.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::cases::{CaseCollection, CaseError, Prediction, SimulationCase, TOP_PREDICTIONS};
use crate::display_name::{DisplayCollision, DisplayIndex};
use crate::extraction::{asked_symptoms_with_mode, extract_profile_and_symptoms, unique_asked_symptoms};
use crate::ledger::{LedgerError, ReviewLedger};
use crate::models::{
    AskedSymptom, LookaheadMode, PatientProfile, RelevantSymptoms, ReviewRecord,
    ReviewSubmission, Turn,
};
use crate::navigation::next_unreviewed;
use crate::validation::{validate_submission, ValidationError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Case(#[from] CaseError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("{0}")]
    Incomplete(#[from] ValidationError),

    #[error("Unknown case: {0}")]
    UnknownCase(String),

    #[error("Unknown case label: {0}")]
    UnknownDisplayName(String),

    #[error("No case selected")]
    NoCaseSelected,
}

/// Everything the renderer needs to show one case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseView {
    pub case_id: String,
    pub display_name: Option<String>,
    pub reviewed: bool,
    pub profile: Option<PatientProfile>,
    pub initial_symptoms: Option<Vec<String>>,
    /// One entry per "ask about" instruction, duplicates included.
    pub asked_symptoms: Vec<AskedSymptom>,
    /// Distinct asked symptoms; the reviewer's relevance checklist.
    pub symptom_choices: Vec<AskedSymptom>,
    pub top_predictions: Vec<Prediction>,
    /// False when the case carries no numeric predictions.
    pub has_predictions: bool,
    pub patient_information: Option<serde_json::Value>,
    pub transcript: Vec<Turn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub reviewed: usize,
    pub total: usize,
}

/// Session snapshot for the case picker.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub case_file: PathBuf,
    pub ledger_path: PathBuf,
    pub display_names: Vec<String>,
    pub current_display: Option<String>,
    pub current_case_id: Option<String>,
    pub progress: Progress,
    pub collisions: Vec<DisplayCollision>,
}

/// Result of a saved review.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub record: ReviewRecord,
    pub ledger_path: PathBuf,
    pub next_display: Option<String>,
    pub all_reviewed: bool,
}

pub struct ReviewSession {
    collection: CaseCollection,
    ledger: ReviewLedger,
    reviewed: HashSet<String>,
    index: DisplayIndex,
    current: Option<String>,
    lookahead: LookaheadMode,
}

impl ReviewSession {
    /// Load `case_file` and its ledger under `reviews_dir`.
    pub fn open(
        case_file: &Path,
        reviews_dir: &Path,
        lookahead: LookaheadMode,
    ) -> Result<Self, SessionError> {
        let collection = CaseCollection::load(case_file)?;
        let ledger = ReviewLedger::for_case_file(case_file, reviews_dir);
        Self::new(collection, ledger, lookahead)
    }

    /// Start on the first unreviewed case (or the first case when all are done).
    pub fn new(
        collection: CaseCollection,
        ledger: ReviewLedger,
        lookahead: LookaheadMode,
    ) -> Result<Self, SessionError> {
        let reviewed = ledger.reviewed_cases()?;
        let mut session = Self {
            collection,
            ledger,
            reviewed,
            index: DisplayIndex::default(),
            current: None,
            lookahead,
        };
        session.rebuild_index();
        session.advance_from(None);

        tracing::info!(
            case_file = %session.collection.source().display(),
            cases = session.collection.len(),
            reviewed = session.reviewed.len(),
            "Review session opened"
        );
        Ok(session)
    }

    pub fn display_names(&self) -> &[String] {
        self.index.names()
    }

    pub fn current_case_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_display(&self) -> Option<&str> {
        self.index.display_for(self.current.as_deref()?)
    }

    pub fn ledger(&self) -> &ReviewLedger {
        &self.ledger
    }

    pub fn is_reviewed(&self, case_id: &str) -> bool {
        self.reviewed.contains(case_id)
    }

    pub fn progress(&self) -> Progress {
        let reviewed = self
            .collection
            .case_ids()
            .filter(|id| self.reviewed.contains(*id))
            .count();
        Progress {
            reviewed,
            total: self.collection.len(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            case_file: self.collection.source().to_path_buf(),
            ledger_path: self.ledger.path().to_path_buf(),
            display_names: self.index.names().to_vec(),
            current_display: self.current_display().map(str::to_string),
            current_case_id: self.current.clone(),
            progress: self.progress(),
            collisions: self.index.collisions().to_vec(),
        }
    }

    /// Select a case by its label in the case picker.
    pub fn select(&mut self, display_name: &str) -> Result<&str, SessionError> {
        let case_id = self
            .index
            .case_for(display_name)
            .ok_or_else(|| SessionError::UnknownDisplayName(display_name.to_string()))?
            .to_string();
        self.select_case(&case_id)
    }

    pub fn select_case(&mut self, case_id: &str) -> Result<&str, SessionError> {
        if self.collection.get(case_id).is_none() {
            return Err(SessionError::UnknownCase(case_id.to_string()));
        }
        tracing::debug!(case_id, "Case selected");
        Ok(self.current.insert(case_id.to_string()).as_str())
    }

    /// Parsed view of the selected case.
    pub fn case_view(&self) -> Result<CaseView, SessionError> {
        let case_id = self.current.as_deref().ok_or(SessionError::NoCaseSelected)?;
        let case = self.case(case_id)?;

        let opening = extract_profile_and_symptoms(&case.conversation_history);
        let asked = asked_symptoms_with_mode(&case.conversation_history, self.lookahead);
        let symptom_choices = unique_asked_symptoms(&asked);

        let top_predictions = case.top_predictions(TOP_PREDICTIONS);

        Ok(CaseView {
            case_id: case_id.to_string(),
            display_name: self.index.display_for(case_id).map(str::to_string),
            reviewed: self.reviewed.contains(case_id),
            profile: opening.profile,
            initial_symptoms: opening.initial_symptoms,
            asked_symptoms: asked,
            symptom_choices,
            has_predictions: !top_predictions.is_empty(),
            top_predictions,
            patient_information: case.patient_information().cloned(),
            transcript: case.visible_turns().into_iter().cloned().collect(),
        })
    }

    /// Validate and persist a review of the selected case, then move on.
    ///
    /// Nothing is written when validation fails. Relevant symptoms are
    /// restricted to the case's asked symptoms, in asked order; every other
    /// asked symptom is recorded as irrelevant.
    pub fn submit(&mut self, submission: &ReviewSubmission) -> Result<SubmitOutcome, SessionError> {
        let case_id = self.current.clone().ok_or(SessionError::NoCaseSelected)?;
        let case = self.case(&case_id)?;
        let asked = unique_asked_symptoms(&asked_symptoms_with_mode(
            &case.conversation_history,
            self.lookahead,
        ));

        let normalized = normalize_submission(submission, &asked);
        if let Err(e) = validate_submission(&normalized) {
            tracing::info!(case_id = %case_id, reason = %e, "Review rejected as incomplete");
            return Err(e.into());
        }

        let record = build_record(&case_id, &normalized, &asked);
        self.ledger.append(&record)?;
        self.reviewed.insert(case_id.clone());
        self.rebuild_index();
        self.advance_from(Some(&case_id));

        let all_reviewed = self.progress().reviewed == self.collection.len();
        Ok(SubmitOutcome {
            record,
            ledger_path: self.ledger.path().to_path_buf(),
            next_display: self.current_display().map(str::to_string),
            all_reviewed,
        })
    }

    fn case(&self, case_id: &str) -> Result<&SimulationCase, SessionError> {
        self.collection
            .get(case_id)
            .ok_or_else(|| SessionError::UnknownCase(case_id.to_string()))
    }

    fn rebuild_index(&mut self) {
        self.index = DisplayIndex::build(self.collection.case_ids(), &self.reviewed);
    }

    /// Move to the next unreviewed case after `from` (a case id).
    fn advance_from(&mut self, from: Option<&str>) {
        let current_display = from
            .and_then(|id| self.index.display_for(id))
            .unwrap_or_default();
        let next = next_unreviewed(
            self.index.names(),
            &self.reviewed,
            self.index.mapping(),
            current_display,
        );
        self.current = next
            .as_deref()
            .and_then(|display| self.index.case_for(display))
            .map(str::to_string);
        if let Some(case_id) = &self.current {
            tracing::debug!(case_id = %case_id, "Next case selected");
        }
    }
}

fn normalize_submission(submission: &ReviewSubmission, asked: &[AskedSymptom]) -> ReviewSubmission {
    let chosen: HashSet<&str> = submission.relevant_symptoms.iter().map(String::as_str).collect();
    let relevant_symptoms = if submission.none_relevant {
        Vec::new()
    } else {
        asked
            .iter()
            .filter(|a| chosen.contains(a.symptom.as_str()))
            .map(|a| a.symptom.clone())
            .collect()
    };
    ReviewSubmission {
        relevant_symptoms,
        ..submission.clone()
    }
}

fn build_record(case_id: &str, submission: &ReviewSubmission, asked: &[AskedSymptom]) -> ReviewRecord {
    let relevant = if submission.none_relevant {
        RelevantSymptoms::NoneRelevant
    } else {
        RelevantSymptoms::Selected(submission.relevant_symptoms.clone())
    };
    let irrelevant_symptoms = asked
        .iter()
        .map(|a| &a.symptom)
        .filter(|name| !relevant.names().contains(*name))
        .cloned()
        .collect();

    ReviewRecord {
        case_id: case_id.to_string(),
        relevance: submission.relevance,
        correctness: submission.correctness,
        relevant_symptoms: relevant,
        irrelevant_symptoms,
        comment: submission.comment.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CorrectnessRating, RelevanceRating};
    use serde_json::json;

    fn sample_file(dir: &Path) -> PathBuf {
        let data = json!({
            "fever_case_1": {
                "conversation_history": [
                    {"role": "user", "content": "{'age': 34, 'sex': 'F'} is experiencing given symptoms fever, cough"},
                    {"role": "system", "content": "you should ask about fever."},
                    {"role": "assistant", "content": "Any fever?"},
                    {"role": "user", "content": "fever: yes"},
                    {"role": "system", "content": "you should ask about rash."},
                    {"role": "user", "content": "No rash"},
                    {"role": "system", "content": "you should ask about fever."},
                    {"role": "user", "content": "fever: yes still"}
                ],
                "chatbot_predictions": {"Flu": 0.6, "Measles": 0.3}
            },
            "cough_case_2": {
                "conversation_history": [
                    {"role": "system", "content": "you should ask about cough."},
                    {"role": "user", "content": "cough: no"}
                ],
                "chatbot_predictions": {}
            },
            "rash_case_3": {"conversation_history": []}
        });
        let path = dir.join("Medbot.json");
        std::fs::write(&path, data.to_string()).unwrap();
        path
    }

    fn open(dir: &Path) -> ReviewSession {
        let file = sample_file(dir);
        ReviewSession::open(&file, &dir.join("reviews"), LookaheadMode::Strict).unwrap()
    }

    fn complete(relevant: &[&str]) -> ReviewSubmission {
        ReviewSubmission {
            relevance: RelevanceRating::Partially,
            correctness: CorrectnessRating::Yes,
            relevant_symptoms: relevant.iter().map(|s| s.to_string()).collect(),
            none_relevant: false,
            comment: Some("reasonable questions".into()),
        }
    }

    #[test]
    fn opens_on_first_unreviewed_case() {
        let tmp = tempfile::tempdir().unwrap();
        let session = open(tmp.path());
        assert_eq!(session.display_names(), ["fever_case", "cough_case", "rash_case"]);
        assert_eq!(session.current_case_id(), Some("fever_case_1"));
        assert_eq!(session.progress(), Progress { reviewed: 0, total: 3 });
        assert!(session.ledger().path().ends_with("doctor_reviews_Medbot.csv"));
    }

    #[test]
    fn existing_ledger_skips_reviewed_cases() {
        let tmp = tempfile::tempdir().unwrap();
        let reviews = tmp.path().join("reviews");
        std::fs::create_dir_all(&reviews).unwrap();
        std::fs::write(
            reviews.join("doctor_reviews_Medbot.csv"),
            "fever_case_1,Yes,Yes,fever,rash,ok\n",
        )
        .unwrap();

        let session = open(tmp.path());
        assert_eq!(session.current_case_id(), Some("cough_case_2"));
        assert_eq!(session.display_names()[0], "✅ fever_case");
        assert!(session.is_reviewed("fever_case_1"));
    }

    #[test]
    fn case_view_collects_parsed_facts() {
        let tmp = tempfile::tempdir().unwrap();
        let session = open(tmp.path());
        let view = session.case_view().unwrap();

        assert_eq!(view.case_id, "fever_case_1");
        assert_eq!(view.profile.unwrap()["age"], json!(34));
        assert_eq!(view.initial_symptoms.unwrap(), vec!["fever", "cough"]);
        assert_eq!(view.asked_symptoms.len(), 3);
        assert_eq!(view.symptom_choices.len(), 2);
        assert_eq!(view.top_predictions[0].disease, "Flu");
        assert!(view.has_predictions);
        assert!(view.transcript.iter().all(|t| t.role != "system"));
        assert!(!view.reviewed);
    }

    #[test]
    fn incomplete_review_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open(tmp.path());

        let mut submission = complete(&[]);
        let err = session.submit(&submission).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Incomplete(ValidationError::NoRelevantSymptomChoice)
        ));

        submission.comment = Some("  ".into());
        submission.none_relevant = true;
        let err = session.submit(&submission).unwrap_err();
        assert!(matches!(err, SessionError::Incomplete(ValidationError::MissingComment)));

        assert!(!session.ledger().exists());
        assert_eq!(session.current_case_id(), Some("fever_case_1"));
    }

    #[test]
    fn symptoms_outside_the_asked_set_do_not_count() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open(tmp.path());
        let err = session.submit(&complete(&["headache"])).unwrap_err();
        assert!(matches!(err, SessionError::Incomplete(_)));
    }

    #[test]
    fn submit_appends_and_advances() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open(tmp.path());

        let outcome = session.submit(&complete(&["fever"])).unwrap();
        assert_eq!(outcome.record.case_id, "fever_case_1");
        assert_eq!(
            outcome.record.relevant_symptoms,
            RelevantSymptoms::Selected(vec!["fever".into()])
        );
        assert_eq!(outcome.record.irrelevant_symptoms, vec!["rash"]);
        assert_eq!(outcome.next_display.as_deref(), Some("cough_case"));
        assert!(!outcome.all_reviewed);

        assert!(session.ledger().reviewed_cases().unwrap().contains("fever_case_1"));
        assert_eq!(session.display_names()[0], "✅ fever_case");
        assert_eq!(session.progress().reviewed, 1);
    }

    #[test]
    fn none_relevant_marks_every_asked_symptom_irrelevant() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open(tmp.path());
        let mut submission = complete(&["fever"]);
        submission.none_relevant = true;

        let outcome = session.submit(&submission).unwrap();
        assert_eq!(outcome.record.relevant_symptoms, RelevantSymptoms::NoneRelevant);
        assert_eq!(outcome.record.irrelevant_symptoms, vec!["fever", "rash"]);
    }

    #[test]
    fn reviewing_everything_falls_back_to_first_case() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open(tmp.path());
        let mut none = complete(&[]);
        none.none_relevant = true;

        session.submit(&complete(&["fever"])).unwrap();
        session.submit(&complete(&["cough"])).unwrap();
        let last = session.submit(&none).unwrap();

        assert!(last.all_reviewed);
        assert_eq!(last.next_display.as_deref(), Some("✅ fever_case"));
        assert_eq!(session.current_case_id(), Some("fever_case_1"));
        assert_eq!(session.ledger().reviews().unwrap().len(), 3);
    }

    #[test]
    fn select_by_label_or_id() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = open(tmp.path());

        assert_eq!(session.select("rash_case").unwrap(), "rash_case_3");
        assert_eq!(session.current_display(), Some("rash_case"));
        assert!(matches!(
            session.select("nope"),
            Err(SessionError::UnknownDisplayName(_))
        ));
        assert!(matches!(
            session.select_case("nope_1"),
            Err(SessionError::UnknownCase(_))
        ));
        assert_eq!(session.select_case("cough_case_2").unwrap(), "cough_case_2");
    }

    #[test]
    fn lenient_mode_changes_status_resolution() {
        let tmp = tempfile::tempdir().unwrap();
        let data = json!({
            "case_1": {"conversation_history": [
                {"role": "system", "content": "you should ask about headache."},
                {"role": "user", "content": "headache? maybe"},
                {"role": "user", "content": "headache: yes"}
            ]}
        });
        let file = tmp.path().join("Trial.json");
        std::fs::write(&file, data.to_string()).unwrap();

        let strict = ReviewSession::open(&file, tmp.path(), LookaheadMode::Strict).unwrap();
        let lenient = ReviewSession::open(&file, tmp.path(), LookaheadMode::Lenient).unwrap();
        assert_eq!(
            strict.case_view().unwrap().asked_symptoms[0].status,
            crate::models::SymptomStatus::Unknown
        );
        assert_eq!(
            lenient.case_view().unwrap().asked_symptoms[0].status,
            crate::models::SymptomStatus::Present
        );
    }
}
