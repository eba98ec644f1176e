//! Knowledge base: symptom synonyms and condition profiles.
//!
//! Loaded once at startup and read-only afterwards.

pub mod reference;
pub mod types;

pub use reference::KnowledgeBase;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Knowledge base load failed ({0}): {1}")]
    Load(String, String),

    #[error("Knowledge base parse failed ({0}): {1}")]
    Parse(String, String),

    #[error("Symptom '{0}' has no usable synonym phrase")]
    EmptySynonyms(String),

    #[error("Duplicate symptom id: {0}")]
    DuplicateSymptom(String),
}
