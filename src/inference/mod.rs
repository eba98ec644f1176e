//! Condition ranking from symptom presence.
//!
//! A presence vector over the full symptom space is scored by a
//! `ConditionClassifier`; the ranking loop sorts, truncates and, on a
//! second pass, re-ranks with user-confirmed extra symptoms.

pub mod classifier;
pub mod naive_bayes;
pub mod ranking;
pub mod space;

pub use classifier::{ConditionClassifier, ConditionProbability};
pub use naive_bayes::{MultinomialNaiveBayes, TrainingRow};
pub use ranking::{normalize_symptom_token, parse_extra_symptoms, RankedPrediction, Refinement};
pub use space::{PresenceVector, SymptomSpace};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model artifact load failed ({0}): {1}")]
    Load(String, String),

    #[error("Model artifact parse failed ({0}): {1}")]
    Parse(String, String),

    #[error("Model artifact save failed ({0}): {1}")]
    Save(String, String),

    #[error("Model artifact is inconsistent: {0}")]
    Shape(String),

    #[error("Cannot fit a model without training rows")]
    EmptyTraining,
}
