//! Case labels shown in the case picker.
//!
//! Raw case ids carry run suffixes (`cough_case_20230423`, `fever-7`) that
//! are noise for the reviewer. Labels drop the suffix, get a marker once the
//! case is reviewed, and map back to the original id through
//! [`DisplayIndex`].

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Prefix for cases already present in the review ledger.
pub const REVIEWED_MARKER: &str = "✅ ";

static NUMERIC_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_-]?\d+$").unwrap());

/// Strip a trailing numeric suffix (optionally after `_` or `-`).
/// An id that is nothing but digits keeps its original text.
pub fn clean_case_label(case_id: &str) -> String {
    let cleaned = NUMERIC_SUFFIX.replace(case_id, "");
    if cleaned.is_empty() {
        case_id.to_string()
    } else {
        cleaned.into_owned()
    }
}

pub fn make_display_name(case_id: &str, reviewed: &HashSet<String>) -> String {
    let label = clean_case_label(case_id);
    if reviewed.contains(case_id) {
        format!("{REVIEWED_MARKER}{label}")
    } else {
        label
    }
}

/// Two case ids that produced the same label. The later id owns the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayCollision {
    pub display_name: String,
    pub replaced_case_id: String,
    pub case_id: String,
}

/// Ordered case labels plus the label → case id side mapping.
#[derive(Debug, Clone, Default)]
pub struct DisplayIndex {
    names: Vec<String>,
    to_case: HashMap<String, String>,
    collisions: Vec<DisplayCollision>,
}

impl DisplayIndex {
    /// Build labels for `case_ids` in order.
    ///
    /// Colliding labels appear once in `names` (at the first position) and
    /// resolve to the last case id registered under them.
    pub fn build<'a, I>(case_ids: I, reviewed: &HashSet<String>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = Self::default();
        for case_id in case_ids {
            let label = make_display_name(case_id, reviewed);
            match index.to_case.insert(label.clone(), case_id.to_string()) {
                None => index.names.push(label),
                Some(replaced) if replaced != case_id => {
                    tracing::warn!(
                        display_name = %label,
                        replaced = %replaced,
                        case_id = %case_id,
                        "Display name collision, later case wins"
                    );
                    index.collisions.push(DisplayCollision {
                        display_name: label,
                        replaced_case_id: replaced,
                        case_id: case_id.to_string(),
                    });
                }
                Some(_) => {}
            }
        }
        index
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn mapping(&self) -> &HashMap<String, String> {
        &self.to_case
    }

    pub fn collisions(&self) -> &[DisplayCollision] {
        &self.collisions
    }

    pub fn case_for(&self, display_name: &str) -> Option<&str> {
        self.to_case.get(display_name).map(String::as_str)
    }

    /// Label currently resolving to `case_id`, if any.
    pub fn display_for(&self, case_id: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|name| self.case_for(name) == Some(case_id))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
