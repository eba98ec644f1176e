//! Triage session: the loaded knowledge base and classifier plus the
//! extraction settings, constructed once and shared read-only.
//!
//! Every request-scoped value (presence vectors, detection results) is built
//! per call, so one `Arc<TriageSession>` can serve concurrent callers
//! without locking.

use std::collections::BTreeSet;
use std::path::Path;

use thiserror::Error;

use crate::config;
use crate::inference::{
    self, ConditionClassifier, ModelError, MultinomialNaiveBayes, RankedPrediction, Refinement,
    SymptomSpace,
};
use crate::knowledge::{KnowledgeBase, KnowledgeError};
use crate::nlp::{DetectionResult, MatcherConfig, RuleSegmenter, SentenceSegmenter, SymptomMatcher};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Data directory not found: {0}")]
    DataDirMissing(String),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A symptom the classifier understands, for listing and autocomplete.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct KnownSymptom {
    pub id: String,
    pub name: String,
}

pub struct TriageSession {
    knowledge: KnowledgeBase,
    classifier: Box<dyn ConditionClassifier>,
    /// Classifier feature order.
    space: SymptomSpace,
    segmenter: Box<dyn SentenceSegmenter>,
    matcher_config: MatcherConfig,
}

impl TriageSession {
    pub fn new(knowledge: KnowledgeBase, classifier: Box<dyn ConditionClassifier>) -> Self {
        let space = SymptomSpace::new(classifier.feature_names().iter().cloned());
        warn_on_vocabulary_drift(&knowledge, &space);
        Self {
            knowledge,
            classifier,
            space,
            segmenter: Box::new(RuleSegmenter),
            matcher_config: MatcherConfig::default(),
        }
    }

    /// Load `symptoms.json`, `conditions.json` and `model.json` from
    /// `data_dir`. Any missing or malformed artifact aborts the load.
    pub fn load(data_dir: &Path) -> Result<Self, SessionError> {
        if !data_dir.is_dir() {
            return Err(SessionError::DataDirMissing(data_dir.display().to_string()));
        }

        let knowledge = KnowledgeBase::load(data_dir)?;
        let model = MultinomialNaiveBayes::load(&data_dir.join(config::MODEL_FILE))?;
        let session = Self::new(knowledge, Box::new(model));

        tracing::info!(
            data_dir = %data_dir.display(),
            symptoms = session.knowledge.symptom_count(),
            conditions = session.knowledge.condition_count(),
            features = session.space.len(),
            labels = session.classifier.labels().len(),
            "Triage session loaded"
        );

        Ok(session)
    }

    pub fn with_segmenter(mut self, segmenter: Box<dyn SentenceSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_matcher_config(mut self, config: MatcherConfig) -> Self {
        self.matcher_config = config;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn classifier(&self) -> &dyn ConditionClassifier {
        self.classifier.as_ref()
    }

    pub fn space(&self) -> &SymptomSpace {
        &self.space
    }

    pub fn matcher_config(&self) -> MatcherConfig {
        self.matcher_config
    }

    /// Detected symptoms in `text`, best confidence first.
    pub fn extract(&self, text: &str) -> Vec<DetectionResult> {
        SymptomMatcher::new(&self.knowledge, self.segmenter.as_ref(), self.matcher_config)
            .extract(text)
    }

    pub fn predict<S: AsRef<str>>(&self, symptom_ids: &[S], top_n: usize) -> Vec<RankedPrediction> {
        inference::ranking::predict(
            self.classifier.as_ref(),
            &self.space,
            &self.knowledge,
            symptom_ids,
            top_n,
        )
    }

    /// `None` when `extra_text` adds no known symptom.
    pub fn refine<S: AsRef<str>>(
        &self,
        prior_ids: &[S],
        extra_text: &str,
        top_n: usize,
    ) -> Option<Refinement> {
        inference::ranking::refine(
            self.classifier.as_ref(),
            &self.space,
            &self.knowledge,
            prior_ids,
            extra_text,
            top_n,
        )
    }

    /// Every symptom in classifier feature order with its display name.
    pub fn all_symptoms(&self) -> Vec<KnownSymptom> {
        self.space
            .ids()
            .iter()
            .map(|id| KnownSymptom {
                id: id.clone(),
                name: self.knowledge.display_name(id).to_string(),
            })
            .collect()
    }
}

fn warn_on_vocabulary_drift(knowledge: &KnowledgeBase, space: &SymptomSpace) {
    let kb_ids: BTreeSet<&str> = knowledge.symptoms().iter().map(|s| s.id.as_str()).collect();
    let model_ids: BTreeSet<&str> = space.ids().iter().map(String::as_str).collect();

    let unmatchable: Vec<&str> = model_ids.difference(&kb_ids).copied().collect();
    if !unmatchable.is_empty() {
        tracing::warn!(
            count = unmatchable.len(),
            ids = ?unmatchable,
            "Model features without knowledge base entries; text cannot detect them"
        );
    }

    let unused: Vec<&str> = kb_ids.difference(&model_ids).copied().collect();
    if !unused.is_empty() {
        tracing::warn!(
            count = unused.len(),
            ids = ?unused,
            "Knowledge base symptoms unknown to the model; ignored when ranking"
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::inference::TrainingRow;

    fn row(condition: &str, symptoms: &[&str]) -> TrainingRow {
        TrainingRow {
            condition: condition.into(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Model fitted over every symptom in `KnowledgeBase::load_test()`.
    pub(crate) fn test_model() -> MultinomialNaiveBayes {
        let rows = vec![
            row("Common Cold", &["runny_nose", "sore_throat", "cough"]),
            row("Common Cold", &["runny_nose", "sore_throat"]),
            row("Influenza", &["fever", "cough", "fatigue", "headache"]),
            row("Influenza", &["fever", "cough", "fatigue"]),
            row("Migraine", &["headache", "nausea"]),
            row("Migraine", &["headache", "nausea", "fatigue"]),
        ];
        MultinomialNaiveBayes::fit(&rows, config::defaults::SMOOTHING_ALPHA).unwrap()
    }

    pub(crate) fn test_session() -> TriageSession {
        TriageSession::new(KnowledgeBase::load_test(), Box::new(test_model()))
    }

    fn write_artifacts(dir: &Path) {
        std::fs::write(
            dir.join(config::SYMPTOMS_FILE),
            r#"{"fever": ["Fever", "high temperature"], "cough": "Cough", "nausea": ["Nausea"]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join(config::CONDITIONS_FILE),
            r#"{"Flu": ["fever", "cough"], "Food Poisoning": ["nausea"]}"#,
        )
        .unwrap();
        let model = MultinomialNaiveBayes::fit(
            &[row("Flu", &["fever", "cough"]), row("Food Poisoning", &["nausea"])],
            1.0,
        )
        .unwrap();
        model.save(&dir.join(config::MODEL_FILE)).unwrap();
    }

    #[test]
    fn session_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TriageSession>();
    }

    #[test]
    fn extract_then_predict_scenario() {
        let session = test_session();
        let detected = session.extract("I have a runny nose and sore throat, no fever.");
        let ids: Vec<&str> = detected.iter().map(|d| d.symptom_id.as_str()).collect();
        assert_eq!(ids, vec!["runny_nose", "sore_throat"]);

        let ranked = session.predict(&ids, config::defaults::TOP_N);
        assert_eq!(ranked[0].condition, "Common Cold");
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn refine_adds_extras() {
        let session = test_session();
        let refined = session
            .refine(&["fever"], "cough, sore throat", config::defaults::TOP_N_REFINED)
            .unwrap();
        assert_eq!(refined.symptom_ids, vec!["cough", "fever", "sore_throat"]);
        assert!(refined.predictions.len() <= config::defaults::TOP_N_REFINED);
    }

    #[test]
    fn matcher_config_is_applied() {
        let session = test_session().with_matcher_config(MatcherConfig {
            confidence_threshold: 100,
            ..MatcherConfig::default()
        });
        assert!(session.extract("fevr").is_empty());
        assert_eq!(session.matcher_config().confidence_threshold, 100);
    }

    #[test]
    fn custom_segmenter_is_used() {
        struct WholeText;
        impl SentenceSegmenter for WholeText {
            fn segment(&self, text: &str) -> Vec<String> {
                vec![text.to_string()]
            }
        }
        // As one sentence, "no" now precedes "fever" within the window.
        let session = test_session().with_segmenter(Box::new(WholeText));
        let detected = session.extract("No. Fever.");
        assert!(detected.is_empty());
        let default_detected = test_session().extract("No. Fever.");
        assert_eq!(default_detected.len(), 1);
    }

    #[test]
    fn all_symptoms_in_feature_order_with_names() {
        let session = test_session();
        let all = session.all_symptoms();
        assert_eq!(all.len(), session.space().len());
        assert_eq!(
            all[0],
            KnownSymptom {
                id: "cough".into(),
                name: "Cough".into()
            }
        );
    }

    #[test]
    fn loads_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());

        let session = TriageSession::load(dir.path()).unwrap();
        assert_eq!(session.knowledge().symptom_count(), 3);
        assert_eq!(session.classifier().labels(), &["Flu", "Food Poisoning"]);

        let detected = session.extract("I've had a high temperature since Monday");
        assert_eq!(detected[0].symptom_id, "fever");
        assert_eq!(detected[0].name, "Fever");
    }

    #[test]
    fn missing_data_dir_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = TriageSession::load(&missing).err().unwrap();
        assert!(matches!(err, SessionError::DataDirMissing(_)));
    }

    #[test]
    fn missing_model_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        std::fs::remove_file(dir.path().join(config::MODEL_FILE)).unwrap();
        let err = TriageSession::load(dir.path()).err().unwrap();
        assert!(matches!(err, SessionError::Model(ModelError::Load(_, _))));
    }

    #[test]
    fn missing_symptoms_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        std::fs::remove_file(dir.path().join(config::SYMPTOMS_FILE)).unwrap();
        let err = TriageSession::load(dir.path()).err().unwrap();
        assert!(matches!(err, SessionError::Knowledge(KnowledgeError::Load(_, _))));
    }

    #[test]
    fn vocabulary_drift_is_not_fatal() {
        let kb = KnowledgeBase::load_test();
        let model = MultinomialNaiveBayes::fit(&[row("X", &["fever", "unlisted"])], 1.0).unwrap();
        let session = TriageSession::new(kb, Box::new(model));
        assert_eq!(session.all_symptoms()[1].name, "unlisted");
    }
}
