//! Case-collection files produced by the interview simulator.
//!
//! A file maps case id → case object with `conversation_history`,
//! `chatbot_predictions` and optional `patient_bot` metadata. File order is
//! kept (serde_json `preserve_order`) for both the case list and the
//! prediction map, which is what breaks probability ties in the top-N view.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Turn, TurnRole};

/// Number of predictions shown to the reviewer.
pub const TOP_PREDICTIONS: usize = 10;

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Cannot read case file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Case file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Case file {0} must contain a JSON object keyed by case id")]
    NotAnObject(PathBuf),
}

/// One simulated interview with the model's output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationCase {
    #[serde(default)]
    pub conversation_history: Vec<Turn>,
    #[serde(default)]
    pub chatbot_predictions: Map<String, Value>,
    #[serde(default)]
    pub patient_bot: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub disease: String,
    pub probability: f64,
}

impl SimulationCase {
    /// Numeric predictions in stored order. Non-numeric entries are dropped.
    pub fn predictions(&self) -> Vec<Prediction> {
        self.chatbot_predictions
            .iter()
            .filter_map(|(disease, value)| {
                value.as_f64().map(|probability| Prediction {
                    disease: disease.clone(),
                    probability,
                })
            })
            .collect()
    }

    /// Highest `n` predictions, descending. Equal probabilities keep stored order.
    pub fn top_predictions(&self, n: usize) -> Vec<Prediction> {
        let mut predictions = self.predictions();
        predictions.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        predictions.truncate(n);
        predictions
    }

    /// `patient_bot["Patient Information"]`, when the simulator recorded it.
    pub fn patient_information(&self) -> Option<&Value> {
        self.patient_bot.as_ref()?.get("Patient Information")
    }

    /// Turns a reviewer reads: everything except system instructions.
    pub fn visible_turns(&self) -> Vec<&Turn> {
        self.conversation_history
            .iter()
            .filter(|turn| !turn.is(TurnRole::System))
            .collect()
    }
}

/// All cases of one file, in file order.
#[derive(Debug, Clone)]
pub struct CaseCollection {
    source: PathBuf,
    cases: Vec<(String, SimulationCase)>,
}

impl CaseCollection {
    pub fn load(path: &Path) -> Result<Self, CaseError> {
        let text = std::fs::read_to_string(path).map_err(|source| CaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let collection = Self::from_json_str(path, &text)?;
        tracing::info!(
            path = %path.display(),
            cases = collection.len(),
            "Case collection loaded"
        );
        Ok(collection)
    }

    /// Parse a collection. Entries that are not case objects are skipped.
    pub fn from_json_str(source: &Path, text: &str) -> Result<Self, CaseError> {
        let root: Value = serde_json::from_str(text).map_err(|source_err| CaseError::Json {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let Value::Object(entries) = root else {
            return Err(CaseError::NotAnObject(source.to_path_buf()));
        };

        let mut cases = Vec::with_capacity(entries.len());
        for (case_id, value) in entries {
            match serde_json::from_value::<SimulationCase>(value) {
                Ok(case) => cases.push((case_id, case)),
                Err(e) => tracing::warn!(case_id = %case_id, error = %e, "Skipping malformed case"),
            }
        }

        Ok(Self {
            source: source.to_path_buf(),
            cases,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn case_ids(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|(id, _)| id.as_str())
    }

    pub fn get(&self, case_id: &str) -> Option<&SimulationCase> {
        self.cases
            .iter()
            .find(|(id, _)| id == case_id)
            .map(|(_, case)| case)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Case files offered to the reviewer.
///
/// Configured names that exist come first, in configured order, followed by
/// any other `*.json` file in `dir` sorted by name. A missing directory
/// yields an empty list.
pub fn list_case_files(dir: &Path, configured: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = configured
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .collect();

    let mut discovered: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect(),
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "Case directory not readable");
            Vec::new()
        }
    };
    discovered.sort();

    for path in discovered {
        if !files.contains(&path) {
            files.push(path);
        }
    }
    files
}
