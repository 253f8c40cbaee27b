//! Conversation parsing for simulated interviews.
//!
//! Recovers the patient's opening statement (profile + initial symptoms)
//! and the symptom questions the interviewer was steered towards, with the
//! patient's answers resolved to present/absent/unknown. Nothing in here
//! fails hard: text that does not match degrades to "not found".

pub mod asked;
pub mod literal;
pub mod profile;

pub use asked::*;
pub use literal::parse_object_literal;
pub use profile::*;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ExtractionError {
    #[error("Unexpected end of literal")]
    UnexpectedEnd,

    #[error("Unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("Invalid number {0:?}")]
    InvalidNumber(String),

    #[error("Invalid escape sequence at offset {0}")]
    InvalidEscape(usize),

    #[error("Trailing input at offset {0}")]
    TrailingInput(usize),

    #[error("Expected an object, found {0}")]
    NotAnObject(&'static str),
}
