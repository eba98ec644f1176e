use serde::Serialize;

use crate::knowledge::KnowledgeBase;

use super::classifier::ConditionClassifier;
use super::space::{PresenceVector, SymptomSpace};

/// One ranked condition, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPrediction {
    pub condition: String,
    pub probability: f64,
    /// `probability * 100`, rounded to two decimals.
    pub confidence_percent: f64,
    /// Display names of the condition's associated symptoms, sorted.
    pub common_symptoms: Vec<String>,
}

/// Outcome of a second ranking pass with extra symptoms.
#[derive(Debug, Clone)]
pub struct Refinement {
    /// Known extra ids that were not already present, in input order.
    pub added: Vec<String>,
    /// Effective symptom set after the union, in space order.
    pub symptom_ids: Vec<String>,
    pub presence: PresenceVector,
    pub predictions: Vec<RankedPrediction>,
}

/// Trim, lowercase and join internal whitespace with `_`.
///
/// "  Sore   Throat " becomes "sore_throat".
pub fn normalize_symptom_token(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Split comma-separated user input into normalized, non-empty tokens.
pub fn parse_extra_symptoms(text: &str) -> Vec<String> {
    text.split(',')
        .map(normalize_symptom_token)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Rank conditions for a set of symptom ids. Unknown ids are ignored; an
/// empty set ranks by the classifier's prior.
pub fn predict<S: AsRef<str>>(
    classifier: &dyn ConditionClassifier,
    space: &SymptomSpace,
    knowledge: &KnowledgeBase,
    symptom_ids: &[S],
    top_n: usize,
) -> Vec<RankedPrediction> {
    let presence = space.presence(symptom_ids);
    let predictions = rank(classifier, knowledge, &presence, top_n);

    tracing::debug!(
        requested = symptom_ids.len(),
        known = presence.active_count(),
        top = predictions.first().map(|p| p.condition.as_str()).unwrap_or(""),
        "Conditions ranked"
    );

    predictions
}

/// Union extra symptoms into a prior set and rank again.
///
/// Returns `None` when `extra_text` names no known symptom id, in which case
/// the earlier ranking stands.
pub fn refine<S: AsRef<str>>(
    classifier: &dyn ConditionClassifier,
    space: &SymptomSpace,
    knowledge: &KnowledgeBase,
    prior_ids: &[S],
    extra_text: &str,
    top_n: usize,
) -> Option<Refinement> {
    let extras: Vec<String> = parse_extra_symptoms(extra_text)
        .into_iter()
        .filter(|token| space.contains(token))
        .collect();

    if extras.is_empty() {
        tracing::debug!("No known extra symptoms; keeping previous ranking");
        return None;
    }

    let prior = space.presence(prior_ids);
    let presence = prior.union(space, &extras);

    let mut added: Vec<String> = Vec::new();
    for token in extras {
        let newly_set = space.position(&token).is_some_and(|pos| !prior.is_set(pos));
        if newly_set && !added.contains(&token) {
            added.push(token);
        }
    }

    let predictions = rank(classifier, knowledge, &presence, top_n);
    let symptom_ids = presence
        .active_ids(space)
        .into_iter()
        .map(str::to_string)
        .collect();

    tracing::info!(added = ?added, total = presence.active_count(), "Symptom set refined");

    Some(Refinement {
        added,
        symptom_ids,
        presence,
        predictions,
    })
}

fn rank(
    classifier: &dyn ConditionClassifier,
    knowledge: &KnowledgeBase,
    presence: &PresenceVector,
    top_n: usize,
) -> Vec<RankedPrediction> {
    let mut probabilities = classifier.predict_probabilities(presence);
    // Stable: equal probabilities keep label order.
    probabilities.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    probabilities.truncate(top_n);

    probabilities
        .into_iter()
        .map(|p| RankedPrediction {
            common_symptoms: knowledge.common_symptom_names(&p.label),
            confidence_percent: round_percent(p.probability),
            probability: p.probability,
            condition: p.label,
        })
        .collect()
}

fn round_percent(probability: f64) -> f64 {
    (probability * 10_000.0).round() / 100.0
}
