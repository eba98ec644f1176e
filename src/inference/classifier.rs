use serde::Serialize;

use super::space::PresenceVector;

/// Probability the classifier assigns to one condition label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionProbability {
    pub label: String,
    pub probability: f64,
}

/// A trained model mapping a symptom presence vector to a distribution
/// over condition labels.
///
/// The ranking loop depends only on this trait, so any probabilistic or
/// rule-based scorer can stand in for the persisted model.
pub trait ConditionClassifier: Send + Sync {
    /// Condition labels in the classifier's internal order.
    fn labels(&self) -> &[String];

    /// Symptom ids in feature order. Defines the presence vector layout.
    fn feature_names(&self) -> &[String];

    /// One entry per label, in `labels()` order, summing to 1.
    fn predict_probabilities(&self, presence: &PresenceVector) -> Vec<ConditionProbability>;
}
