use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{AskedSymptom, LookaheadMode, SymptomStatus, Turn, TurnRole};

/// Steering instruction injected into the interviewer's system turns.
static ASK_ABOUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)you should ask about ([^.\n]+)").unwrap());

/// Symptoms the interviewer was told to ask about, with the patient's
/// answer, in transcript order. Uses [`LookaheadMode::Strict`].
pub fn get_asked_symptoms_with_status(transcript: &[Turn]) -> Vec<AskedSymptom> {
    asked_symptoms_with_mode(transcript, LookaheadMode::Strict)
}

/// Same as [`get_asked_symptoms_with_status`] with an explicit lookahead mode.
///
/// For every system turn carrying an "ask about" instruction, the following
/// user turns are scanned. A user turn *qualifies* when its lower-cased
/// content mentions the symptom, or starts with `<symptom>:`. In strict mode
/// the first qualifying turn decides the status, even when it resolves to
/// unknown. Lenient mode keeps scanning past qualifying turns that resolved
/// to unknown.
///
/// Duplicate instructions yield duplicate records; see
/// [`unique_asked_symptoms`] for the set view.
pub fn asked_symptoms_with_mode(transcript: &[Turn], mode: LookaheadMode) -> Vec<AskedSymptom> {
    let mut asked = Vec::new();

    for (i, turn) in transcript.iter().enumerate() {
        if !turn.is(TurnRole::System) {
            continue;
        }
        let Some(caps) = ASK_ABOUT.captures(&turn.content) else {
            continue;
        };
        let symptom = caps[1].trim().to_string();
        let status = resolve_status(&symptom, &transcript[i + 1..], mode);
        asked.push(AskedSymptom { symptom, status });
    }

    tracing::trace!(count = asked.len(), ?mode, "Asked symptoms extracted");
    asked
}

/// Collapse records with identical symptom text, keeping the first.
pub fn unique_asked_symptoms(asked: &[AskedSymptom]) -> Vec<AskedSymptom> {
    let mut seen = HashSet::new();
    asked
        .iter()
        .filter(|record| seen.insert(record.symptom.as_str()))
        .cloned()
        .collect()
}

fn resolve_status(symptom: &str, following: &[Turn], mode: LookaheadMode) -> SymptomStatus {
    let needle = symptom.to_lowercase();
    let prefix = format!("{needle}:");
    let mut status = SymptomStatus::Unknown;

    for turn in following.iter().filter(|t| t.is(TurnRole::User)) {
        let content = turn.content.to_lowercase();

        let resolved = if content.contains(&needle) {
            Some(status_from_answer(&content))
        } else if content.starts_with(&prefix) {
            let answer = content.split_once(':').map_or("", |(_, rest)| rest);
            Some(status_from_answer(answer))
        } else {
            None
        };

        if let Some(found) = resolved {
            status = found;
            if mode == LookaheadMode::Strict || found != SymptomStatus::Unknown {
                break;
            }
        }
    }

    status
}

/// Plain substring check: "yes" wins over "no".
fn status_from_answer(answer: &str) -> SymptomStatus {
    if answer.contains("yes") {
        SymptomStatus::Present
    } else if answer.contains("no") {
        SymptomStatus::Absent
    } else {
        SymptomStatus::Unknown
    }
}
