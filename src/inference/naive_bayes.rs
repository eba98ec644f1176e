//! Multinomial naive Bayes over multi-hot symptom rows.
//!
//! The persisted artifact stores log priors and per-class feature log
//! probabilities; prediction is a dot product plus prior, normalized with
//! log-sum-exp. With no symptoms set the result is the class prior.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classifier::{ConditionClassifier, ConditionProbability};
use super::space::PresenceVector;
use super::ModelError;

/// One labelled observation: a condition and the symptom ids seen with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRow {
    pub condition: String,
    pub symptoms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    labels: Vec<String>,
    features: Vec<String>,
    class_log_prior: Vec<f64>,
    /// `[label][feature]`
    feature_log_prob: Vec<Vec<f64>>,
    alpha: f64,
}

impl MultinomialNaiveBayes {
    /// Fit on labelled rows. Labels and features are sorted; each symptom
    /// counts at most once per row.
    pub fn fit(rows: &[TrainingRow], alpha: f64) -> Result<Self, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyTraining);
        }
        if alpha.is_nan() || alpha <= 0.0 {
            return Err(ModelError::Shape(format!("smoothing alpha must be positive, got {alpha}")));
        }

        let labels: Vec<String> = rows
            .iter()
            .map(|r| r.condition.trim().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let features: Vec<String> = rows
            .iter()
            .flat_map(|r| r.symptoms.iter().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let label_pos: BTreeMap<&str, usize> =
            labels.iter().enumerate().map(|(i, l)| (l.as_str(), i)).collect();
        let feature_pos: BTreeMap<&str, usize> =
            features.iter().enumerate().map(|(i, f)| (f.as_str(), i)).collect();

        let mut class_rows = vec![0usize; labels.len()];
        let mut counts = vec![vec![0usize; features.len()]; labels.len()];

        for row in rows {
            let c = label_pos[row.condition.trim()];
            class_rows[c] += 1;
            let present: BTreeSet<usize> = row
                .symptoms
                .iter()
                .filter_map(|s| feature_pos.get(s.trim()).copied())
                .collect();
            for j in present {
                counts[c][j] += 1;
            }
        }

        let n_features = features.len() as f64;
        let n_rows = rows.len() as f64;

        let class_log_prior = class_rows
            .iter()
            .map(|&n| (n as f64 / n_rows).ln())
            .collect();

        let feature_log_prob = counts
            .iter()
            .map(|class_counts| {
                let total: usize = class_counts.iter().sum();
                let denom = (total as f64 + alpha * n_features).ln();
                class_counts
                    .iter()
                    .map(|&n| (n as f64 + alpha).ln() - denom)
                    .collect()
            })
            .collect();

        let model = Self {
            labels,
            features,
            class_log_prior,
            feature_log_prob,
            alpha,
        };

        tracing::info!(
            rows = rows.len(),
            labels = model.labels.len(),
            features = model.features.len(),
            "Naive Bayes model fitted"
        );

        Ok(model)
    }

    /// Load and validate a JSON artifact.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ModelError::Load(path.display().to_string(), e.to_string()))?;
        let model: Self = serde_json::from_str(&json)
            .map_err(|e| ModelError::Parse(path.display().to_string(), e.to_string()))?;
        model.validate()?;

        tracing::info!(
            labels = model.labels.len(),
            features = model.features.len(),
            "Model artifact loaded"
        );
        Ok(model)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ModelError::Save(path.display().to_string(), e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| ModelError::Save(path.display().to_string(), e.to_string()))
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.labels.is_empty() {
            return Err(ModelError::Shape("no condition labels".into()));
        }
        if self.features.is_empty() {
            return Err(ModelError::Shape("no symptom features".into()));
        }
        if self.class_log_prior.len() != self.labels.len() {
            return Err(ModelError::Shape(format!(
                "{} priors for {} labels",
                self.class_log_prior.len(),
                self.labels.len()
            )));
        }
        if self.feature_log_prob.len() != self.labels.len() {
            return Err(ModelError::Shape(format!(
                "{} feature rows for {} labels",
                self.feature_log_prob.len(),
                self.labels.len()
            )));
        }
        if let Some((i, row)) = self
            .feature_log_prob
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.features.len())
        {
            return Err(ModelError::Shape(format!(
                "feature row for '{}' has {} entries, expected {}",
                self.labels[i],
                row.len(),
                self.features.len()
            )));
        }
        Ok(())
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Unnormalized log posterior per label.
    fn joint_log_likelihood(&self, presence: &PresenceVector) -> Vec<f64> {
        self.feature_log_prob
            .iter()
            .zip(&self.class_log_prior)
            .map(|(row, prior)| {
                prior
                    + row
                        .iter()
                        .zip(presence.values())
                        .filter(|(_, v)| **v != 0)
                        .map(|(log_p, &v)| log_p * f64::from(v))
                        .sum::<f64>()
            })
            .collect()
    }
}

impl ConditionClassifier for MultinomialNaiveBayes {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn predict_probabilities(&self, presence: &PresenceVector) -> Vec<ConditionProbability> {
        if presence.len() != self.features.len() {
            tracing::warn!(
                presence = presence.len(),
                features = self.features.len(),
                "Presence vector dimension differs from model features"
            );
        }

        let jll = self.joint_log_likelihood(presence);
        let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = jll.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();

        self.labels
            .iter()
            .zip(exps)
            .map(|(label, e)| ConditionProbability {
                label: label.clone(),
                probability: e / total,
            })
            .collect()
    }
}
