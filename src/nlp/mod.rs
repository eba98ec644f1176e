//! Symptom extraction from free text.
//!
//! raw text → sentences → token-set similarity against every synonym →
//! negation filter → best confidence per symptom.

pub mod matcher;
pub mod negation;
pub mod segment;
pub mod similarity;
pub mod tokenize;
pub mod types;

pub use matcher::{MatcherConfig, SymptomMatcher};
pub use negation::is_negated;
pub use segment::{RuleSegmenter, SentenceSegmenter};
pub use similarity::token_set_ratio;
pub use types::DetectionResult;
