use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::knowledge::KnowledgeBase;

use super::negation::is_negated;
use super::segment::SentenceSegmenter;
use super::similarity::token_set_ratio;
use super::types::DetectionResult;

/// Tuning for the fuzzy matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Scores below this (0-100) are discarded.
    pub confidence_threshold: u8,
    /// Tokens scanned backwards for a negation marker.
    pub negation_window: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: defaults::CONFIDENCE_THRESHOLD,
            negation_window: defaults::NEGATION_WINDOW,
        }
    }
}

/// Scores every (synonym, sentence) pair and keeps the best surviving
/// confidence per symptom.
pub struct SymptomMatcher<'a> {
    knowledge: &'a KnowledgeBase,
    segmenter: &'a dyn SentenceSegmenter,
    config: MatcherConfig,
}

impl<'a> SymptomMatcher<'a> {
    pub fn new(
        knowledge: &'a KnowledgeBase,
        segmenter: &'a dyn SentenceSegmenter,
        config: MatcherConfig,
    ) -> Self {
        Self {
            knowledge,
            segmenter,
            config,
        }
    }

    /// Extract symptoms from free text, sorted by confidence descending.
    /// Equal confidences keep knowledge-base order. Empty text yields nothing.
    pub fn extract(&self, text: &str) -> Vec<DetectionResult> {
        let sentences: Vec<String> = self
            .segmenter
            .segment(text)
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect();

        if sentences.is_empty() {
            tracing::debug!("No sentences to scan");
            return Vec::new();
        }

        let entries = self.knowledge.symptoms();
        let mut best: Vec<Option<u8>> = vec![None; entries.len()];
        let mut negated = 0usize;

        for (pos, entry) in entries.iter().enumerate() {
            for synonym in &entry.synonyms {
                let phrase = synonym.to_lowercase();
                for sentence in &sentences {
                    let score = token_set_ratio(&phrase, sentence);
                    if score < self.config.confidence_threshold {
                        continue;
                    }
                    // Cannot raise the stored score; skip the negation scan.
                    if best[pos].is_some_and(|current| current >= score) {
                        continue;
                    }
                    if is_negated(sentence, &phrase, self.config.negation_window) {
                        negated += 1;
                        tracing::debug!(symptom = %entry.id, phrase = %phrase, "Negated mention dropped");
                        continue;
                    }
                    best[pos] = Some(score);
                }
            }
        }

        let mut results: Vec<DetectionResult> = entries
            .iter()
            .zip(best)
            .filter_map(|(entry, score)| {
                score.map(|confidence| DetectionResult {
                    symptom_id: entry.id.clone(),
                    name: entry.display_name().to_string(),
                    confidence,
                })
            })
            .collect();

        // Stable: ties keep knowledge-base order.
        results.sort_by(|a, b| b.confidence.cmp(&a.confidence));

        tracing::debug!(
            sentences = sentences.len(),
            matches = results.len(),
            negated,
            "Symptom extraction complete"
        );

        results
    }
}
