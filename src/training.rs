//! Build the model and condition mapping from labelled symptom rows.
//!
//! Input is a JSON array of `{condition, symptoms: [ids]}` rows. Output is
//! `model.json` plus `conditions.json` mapping each condition to every
//! symptom id seen with it. When the output directory has no
//! `symptoms.json` yet, one is written with a readable name per id so a
//! session can start from the output alone.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::config;
use crate::inference::{ConditionClassifier, ModelError, MultinomialNaiveBayes, TrainingRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainSummary {
    pub rows: usize,
    pub conditions: usize,
    pub symptoms: usize,
    /// True when a default `symptoms.json` was created.
    pub wrote_symptoms: bool,
}

/// Readable name for a symptom id: underscores become spaces and every
/// word is capitalized. "sore_throat" becomes "Sore Throat".
pub fn title_case_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut prev_alpha = false;
    for c in id.trim().chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Union of symptom ids per condition, both levels sorted.
pub fn conditions_from_rows(rows: &[TrainingRow]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry(row.condition.trim().to_string())
            .or_default()
            .extend(
                row.symptoms
                    .iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
            );
    }
    grouped
        .into_iter()
        .map(|(condition, ids)| (condition, ids.into_iter().collect()))
        .collect()
}

pub fn read_rows(path: &Path) -> Result<Vec<TrainingRow>, ModelError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ModelError::Load(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&json)
        .map_err(|e| ModelError::Parse(path.display().to_string(), e.to_string()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ModelError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ModelError::Save(path.display().to_string(), e.to_string()))?;
    std::fs::write(path, json)
        .map_err(|e| ModelError::Save(path.display().to_string(), e.to_string()))
}

/// Fit on `rows_path` and write the artifacts into `out_dir`, creating it
/// if needed.
pub fn train_from_file(rows_path: &Path, out_dir: &Path) -> Result<TrainSummary, ModelError> {
    let rows = read_rows(rows_path)?;
    let model = MultinomialNaiveBayes::fit(&rows, config::defaults::SMOOTHING_ALPHA)?;
    let conditions = conditions_from_rows(&rows);

    std::fs::create_dir_all(out_dir)
        .map_err(|e| ModelError::Save(out_dir.display().to_string(), e.to_string()))?;

    model.save(&out_dir.join(config::MODEL_FILE))?;

    write_json(&out_dir.join(config::CONDITIONS_FILE), &conditions)?;

    let symptoms_path = out_dir.join(config::SYMPTOMS_FILE);
    let wrote_symptoms = !symptoms_path.exists();
    if wrote_symptoms {
        let names: BTreeMap<&str, String> = model
            .feature_names()
            .iter()
            .map(|id| (id.as_str(), title_case_id(id)))
            .collect();
        write_json(&symptoms_path, &names)?;
    }

    let summary = TrainSummary {
        rows: rows.len(),
        conditions: conditions.len(),
        symptoms: model.feature_names().len(),
        wrote_symptoms,
    };

    tracing::info!(
        out_dir = %out_dir.display(),
        rows = summary.rows,
        conditions = summary.conditions,
        symptoms = summary.symptoms,
        alpha = model.alpha(),
        wrote_symptoms,
        "Model artifacts written"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TriageSession;

    const ROWS: &str = r#"[
        {"condition": "Flu", "symptoms": ["fever", "cough"]},
        {"condition": "Flu", "symptoms": ["fever", "fatigue"]},
        {"condition": "Migraine", "symptoms": ["headache", "nausea"]}
    ]"#;

    #[test]
    fn groups_symptoms_by_condition() {
        let rows: Vec<TrainingRow> = serde_json::from_str(ROWS).unwrap();
        let conditions = conditions_from_rows(&rows);
        assert_eq!(conditions["Flu"], vec!["cough", "fatigue", "fever"]);
        assert_eq!(conditions["Migraine"], vec!["headache", "nausea"]);
    }

    #[test]
    fn writes_loadable_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let rows_path = dir.path().join("rows.json");
        std::fs::write(&rows_path, ROWS).unwrap();
        let out = dir.path().join("data");

        let summary = train_from_file(&rows_path, &out).unwrap();
        assert_eq!(
            summary,
            TrainSummary {
                rows: 3,
                conditions: 2,
                symptoms: 5,
                wrote_symptoms: true
            }
        );

        let model = MultinomialNaiveBayes::load(&out.join(config::MODEL_FILE)).unwrap();
        assert_eq!(model.labels(), &["Flu", "Migraine"]);

        let written: BTreeMap<String, Vec<String>> = serde_json::from_str(
            &std::fs::read_to_string(out.join(config::CONDITIONS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(written.len(), 2);
    }

    #[test]
    fn title_cases_ids() {
        assert_eq!(title_case_id("sore_throat"), "Sore Throat");
        assert_eq!(title_case_id("fever"), "Fever");
        assert_eq!(title_case_id("SKIN_rash"), "Skin Rash");
    }

    #[test]
    fn session_starts_from_training_output() {
        let dir = tempfile::tempdir().unwrap();
        let rows_path = dir.path().join("rows.json");
        std::fs::write(&rows_path, ROWS).unwrap();
        let out = dir.path().join("data");
        train_from_file(&rows_path, &out).unwrap();

        let session = TriageSession::load(&out).unwrap();
        assert_eq!(session.knowledge().symptom_count(), 5);

        let detected = session.extract("I have a fever and a bad headache");
        let ids: Vec<&str> = detected.iter().map(|d| d.symptom_id.as_str()).collect();
        assert_eq!(ids, vec!["fever", "headache"]);
        assert_eq!(detected[0].name, "Fever");

        let ranked = session.predict(&ids, config::defaults::TOP_N);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn existing_symptoms_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let rows_path = dir.path().join("rows.json");
        std::fs::write(&rows_path, ROWS).unwrap();
        let custom = r#"{"fever": ["Fever", "high temperature"]}"#;
        std::fs::write(dir.path().join(config::SYMPTOMS_FILE), custom).unwrap();

        let summary = train_from_file(&rows_path, dir.path()).unwrap();
        assert!(!summary.wrote_symptoms);
        assert_eq!(
            std::fs::read_to_string(dir.path().join(config::SYMPTOMS_FILE)).unwrap(),
            custom
        );
    }

    #[test]
    fn malformed_rows_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let rows_path = dir.path().join("rows.json");
        std::fs::write(&rows_path, r#"{"condition": "Flu"}"#).unwrap();
        let err = train_from_file(&rows_path, dir.path()).unwrap_err();
        assert!(matches!(err, ModelError::Parse(_, _)));
    }

    #[test]
    fn empty_rows_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let rows_path = dir.path().join("rows.json");
        std::fs::write(&rows_path, "[]").unwrap();
        let err = train_from_file(&rows_path, dir.path()).unwrap_err();
        assert!(matches!(err, ModelError::EmptyTraining));
    }
}
