//! Append-only review ledger.
//!
//! One headerless row per submitted review, six fields:
//! case id, relevance, correctness, relevant symptoms (`|`-joined or the
//! "none relevant" sentinel), irrelevant symptoms (`|`-joined), comment.
//! Rows are only ever appended. Fields are quoted when they contain a
//! delimiter, quote or line break, so plain rows stay byte-identical to the
//! historical unquoted format.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::review::{join_symptoms, split_symptoms};
use crate::models::{RelevantSymptoms, ReviewRecord};

/// File name prefix shared by every ledger.
pub const LEDGER_PREFIX: &str = "doctor_reviews_";

/// Number of fields in a ledger row.
pub const ROW_FIELDS: usize = 6;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Ledger file name for a case-collection file: `doctor_reviews_<stem>.csv`.
pub fn ledger_file_name(case_file: &Path) -> String {
    let stem = case_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{LEDGER_PREFIX}{stem}.csv")
}

pub fn ledger_path_for(case_file: &Path, reviews_dir: &Path) -> PathBuf {
    reviews_dir.join(ledger_file_name(case_file))
}

/// Case ids with at least one row in the ledger.
///
/// A missing ledger means nothing has been reviewed yet. The case id is the
/// first field of each row; a row the CSV reader cannot decode falls back
/// to the text before its first comma.
pub fn load_reviewed_cases(path: &Path) -> Result<HashSet<String>, LedgerError> {
    let Some(text) = read_ledger_text(path)? else {
        return Ok(HashSet::new());
    };

    let mut reviewed = HashSet::new();
    for (line, row) in ledger_rows(&text) {
        let case_id = match parse_row(row) {
            Some(fields) => fields.get(0).map(str::to_string),
            None => {
                tracing::warn!(path = %path.display(), line, "Undecodable ledger row, using first column");
                row.split(',').next().map(str::to_string)
            }
        };
        if let Some(case_id) = case_id.filter(|id| !id.is_empty()) {
            reviewed.insert(case_id);
        }
    }

    tracing::debug!(path = %path.display(), count = reviewed.len(), "Reviewed cases loaded");
    Ok(reviewed)
}

/// Append one review row. Existing rows are never touched.
pub fn append_review(path: &Path, record: &ReviewRecord) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);
    writer.write_record(record_to_row(record))?;
    writer.flush()?;

    tracing::info!(
        path = %path.display(),
        case_id = %record.case_id,
        relevance = %record.relevance,
        correctness = %record.correctness,
        "Review appended"
    );
    Ok(())
}

/// Every decodable review in the ledger, in file order.
/// Rows with the wrong field count or unknown ratings are skipped.
pub fn read_reviews(path: &Path) -> Result<Vec<ReviewRecord>, LedgerError> {
    let Some(text) = read_ledger_text(path)? else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for (line, row) in ledger_rows(&text) {
        match parse_row(row).and_then(|fields| row_to_record(&fields)) {
            Some(record) => records.push(record),
            None => tracing::warn!(path = %path.display(), line, "Skipping malformed ledger row"),
        }
    }
    Ok(records)
}

/// Handle to the ledger of one case-collection file.
#[derive(Debug, Clone)]
pub struct ReviewLedger {
    path: PathBuf,
}

impl ReviewLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_case_file(case_file: &Path, reviews_dir: &Path) -> Self {
        Self::new(ledger_path_for(case_file, reviews_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn reviewed_cases(&self) -> Result<HashSet<String>, LedgerError> {
        load_reviewed_cases(&self.path)
    }

    pub fn append(&self, record: &ReviewRecord) -> Result<(), LedgerError> {
        append_review(&self.path, record)
    }

    pub fn reviews(&self) -> Result<Vec<ReviewRecord>, LedgerError> {
        read_reviews(&self.path)
    }

    /// Raw ledger bytes, unmodified. Empty when nothing was written yet.
    pub fn contents(&self) -> Result<Vec<u8>, LedgerError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

fn read_ledger_text(path: &Path) -> Result<Option<String>, LedgerError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Split ledger text into rows, each tagged with its 1-based starting line.
///
/// A row runs onto following lines only while one of its quoted fields is
/// still open. A quote that never closes before end of file is literal
/// text of its own line, so older unescaped comments cannot hide the rows
/// after them.
fn ledger_rows(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        spans.push((offset, offset + line.len()));
        offset += line.len();
    }

    let mut rows = Vec::new();
    let mut first = 0;
    while first < spans.len() {
        let mut last = first;
        let mut quotes = 0;
        loop {
            let (start, end) = spans[last];
            quotes += text[start..end].matches('"').count();
            if quotes % 2 == 0 || last + 1 == spans.len() {
                break;
            }
            last += 1;
        }
        if quotes % 2 != 0 {
            last = first;
        }

        let row = text[spans[first].0..spans[last].1].trim_end_matches(['\r', '\n']);
        if !row.trim().is_empty() {
            rows.push((first + 1, row));
        }
        first = last + 1;
    }
    rows
}

fn parse_row(row: &str) -> Option<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(row.as_bytes());
    reader.records().next()?.ok()
}

fn record_to_row(record: &ReviewRecord) -> [String; ROW_FIELDS] {
    [
        record.case_id.clone(),
        record.relevance.as_str().to_string(),
        record.correctness.as_str().to_string(),
        record.relevant_symptoms.to_field(),
        join_symptoms(&record.irrelevant_symptoms),
        record.comment.clone(),
    ]
}

fn row_to_record(row: &csv::StringRecord) -> Option<ReviewRecord> {
    if row.len() != ROW_FIELDS {
        return None;
    }
    Some(ReviewRecord {
        case_id: row.get(0)?.to_string(),
        relevance: row.get(1)?.parse().ok()?,
        correctness: row.get(2)?.parse().ok()?,
        relevant_symptoms: RelevantSymptoms::from_field(row.get(3)?),
        irrelevant_symptoms: split_symptoms(row.get(4)?),
        comment: row.get(5)?.to_string(),
    })
}
