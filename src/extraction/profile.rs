use std::sync::LazyLock;

use regex::Regex;

use super::literal::parse_object_literal;
use crate::models::{ProfileExtraction, Turn, TurnRole};

/// Opening statement the patient simulator sends:
/// `{...profile...} is experiencing given symptoms a, b, c`.
static OPENING_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(\{.*?\})\s*is experiencing given symptoms\s*(.*)").unwrap()
});

/// Find the patient profile and the initial symptom list.
///
/// Only user turns are examined and the first matching turn wins. An
/// unparseable profile literal leaves `profile` empty while the symptom
/// list is still recovered from the same turn.
pub fn extract_profile_and_symptoms(transcript: &[Turn]) -> ProfileExtraction {
    for (index, turn) in transcript.iter().enumerate() {
        if !turn.is(TurnRole::User) {
            continue;
        }
        let Some(caps) = OPENING_STATEMENT.captures(&turn.content) else {
            continue;
        };

        let literal = caps.get(1).map_or("", |m| m.as_str());
        let profile = match parse_object_literal(literal) {
            Ok(map) => Some(map),
            Err(e) => {
                tracing::debug!(turn = index, error = %e, "Profile literal not parseable");
                None
            }
        };

        let initial_symptoms = split_symptom_list(caps.get(2).map_or("", |m| m.as_str()));

        return ProfileExtraction {
            profile,
            initial_symptoms: Some(initial_symptoms),
        };
    }

    ProfileExtraction::default()
}

/// Split a comma-separated symptom list, trimming and dropping blanks.
pub fn split_symptom_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
