use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config;

use super::types::{ConditionProfile, SymptomEntry, SynonymValue};
use super::KnowledgeError;

/// Symptom synonyms and condition profiles, immutable after load.
///
/// Symptom entries iterate in id order; that order is the tie-break for
/// equally confident extraction results.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    symptoms: Vec<SymptomEntry>,
    index: HashMap<String, usize>,
    conditions: BTreeMap<String, ConditionProfile>,
}

impl KnowledgeBase {
    pub fn new(
        mut symptoms: Vec<SymptomEntry>,
        conditions: Vec<ConditionProfile>,
    ) -> Result<Self, KnowledgeError> {
        symptoms.sort_by(|a, b| a.id.cmp(&b.id));

        let mut index = HashMap::with_capacity(symptoms.len());
        for (pos, entry) in symptoms.iter().enumerate() {
            if index.insert(entry.id.clone(), pos).is_some() {
                return Err(KnowledgeError::DuplicateSymptom(entry.id.clone()));
            }
        }

        let conditions = conditions
            .into_iter()
            .map(|profile| (profile.name.clone(), profile))
            .collect();

        Ok(Self {
            symptoms,
            index,
            conditions,
        })
    }

    /// Build from the already-parsed on-disk shapes.
    pub fn from_raw(
        symptoms: BTreeMap<String, SynonymValue>,
        conditions: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, KnowledgeError> {
        let entries = symptoms
            .into_iter()
            .map(|(id, value)| SymptomEntry::new(id, value.into_synonyms()))
            .collect::<Result<Vec<_>, _>>()?;
        let profiles = conditions
            .into_iter()
            .map(|(name, ids)| ConditionProfile::new(name, ids))
            .collect();
        Self::new(entries, profiles)
    }

    /// Load `symptoms.json` and `conditions.json` from the data directory.
    pub fn load(data_dir: &Path) -> Result<Self, KnowledgeError> {
        let symptoms: BTreeMap<String, SynonymValue> =
            read_json(data_dir, config::SYMPTOMS_FILE)?;
        let conditions: BTreeMap<String, Vec<String>> =
            read_json(data_dir, config::CONDITIONS_FILE)?;

        let kb = Self::from_raw(symptoms, conditions)?;
        tracing::info!(
            symptoms = kb.symptom_count(),
            conditions = kb.condition_count(),
            "Knowledge base loaded"
        );
        Ok(kb)
    }

    /// Create a small knowledge base for tests (no file I/O).
    #[cfg(test)]
    pub fn load_test() -> Self {
        let symptoms = [
            ("cough", vec!["Cough", "coughing"]),
            ("fatigue", vec!["Fatigue", "tired all the time"]),
            ("fever", vec!["Fever", "high temperature"]),
            ("headache", vec!["Headache", "head hurts"]),
            ("nausea", vec!["Nausea", "feel sick to my stomach"]),
            ("runny_nose", vec!["Runny Nose", "nose is running"]),
            ("sore_throat", vec!["Sore Throat", "throat hurts"]),
        ]
        .into_iter()
        .map(|(id, phrases)| SymptomEntry {
            id: id.into(),
            synonyms: phrases.into_iter().map(String::from).collect(),
        })
        .collect();

        let conditions = vec![
            ConditionProfile::new("Common Cold", ["runny_nose", "sore_throat", "cough"]),
            ConditionProfile::new("Influenza", ["fever", "cough", "fatigue", "headache"]),
            ConditionProfile::new("Migraine", ["headache", "nausea"]),
        ];

        Self::new(symptoms, conditions).expect("test knowledge base has unique ids")
    }

    pub fn symptoms(&self) -> &[SymptomEntry] {
        &self.symptoms
    }

    pub fn symptom(&self, id: &str) -> Option<&SymptomEntry> {
        self.index.get(id).map(|&pos| &self.symptoms[pos])
    }

    pub fn contains_symptom(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Canonical name for a symptom id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.symptom(id).map(SymptomEntry::display_name).unwrap_or(id)
    }

    pub fn condition(&self, name: &str) -> Option<&ConditionProfile> {
        self.conditions.get(name)
    }

    pub fn conditions(&self) -> impl Iterator<Item = &ConditionProfile> {
        self.conditions.values()
    }

    /// Display names of a condition's associated symptoms, sorted.
    /// Empty when the condition has no profile.
    pub fn common_symptom_names(&self, condition: &str) -> Vec<String> {
        let Some(profile) = self.condition(condition) else {
            return Vec::new();
        };
        let mut names: Vec<String> = profile
            .associated_symptoms
            .iter()
            .map(|id| self.display_name(id).to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn symptom_count(&self) -> usize {
        self.symptoms.len()
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, KnowledgeError> {
    let path = dir.join(file);
    let json = std::fs::read_to_string(&path)
        .map_err(|e| KnowledgeError::Load(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| KnowledgeError::Parse(file.into(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symptoms_iterate_in_id_order() {
        let kb = KnowledgeBase::load_test();
        let ids: Vec<&str> = kb.symptoms().iter().map(|s| s.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn lookup_by_id() {
        let kb = KnowledgeBase::load_test();
        assert_eq!(kb.symptom("fever").unwrap().display_name(), "Fever");
        assert!(kb.symptom("chills").is_none());
        assert!(kb.contains_symptom("runny_nose"));
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let kb = KnowledgeBase::load_test();
        assert_eq!(kb.display_name("sore_throat"), "Sore Throat");
        assert_eq!(kb.display_name("itching"), "itching");
    }

    #[test]
    fn common_symptom_names_sorted() {
        let kb = KnowledgeBase::load_test();
        assert_eq!(
            kb.common_symptom_names("Influenza"),
            vec!["Cough", "Fatigue", "Fever", "Headache"]
        );
        assert!(kb.common_symptom_names("Unknown Condition").is_empty());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let entries = vec![
            SymptomEntry::new("fever", vec!["Fever".into()]).unwrap(),
            SymptomEntry::new("fever", vec!["Pyrexia".into()]).unwrap(),
        ];
        let err = KnowledgeBase::new(entries, vec![]).unwrap_err();
        assert!(matches!(err, KnowledgeError::DuplicateSymptom(_)));
    }

    #[test]
    fn load_mixed_synonym_shapes_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(config::SYMPTOMS_FILE),
            r#"{"fever": "Fever", "cough": ["Cough", "hacking cough"]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(config::CONDITIONS_FILE),
            r#"{"Bronchitis": ["cough", "fever"]}"#,
        )
        .unwrap();

        let kb = KnowledgeBase::load(dir.path()).unwrap();
        assert_eq!(kb.symptom_count(), 2);
        assert_eq!(kb.symptom("fever").unwrap().synonyms, vec!["Fever"]);
        assert_eq!(kb.symptom("cough").unwrap().synonyms.len(), 2);
        assert_eq!(kb.condition_count(), 1);
    }

    #[test]
    fn missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KnowledgeBase::load(dir.path()).unwrap_err();
        assert!(matches!(err, KnowledgeError::Load(path, _) if path.ends_with("symptoms.json")));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(config::SYMPTOMS_FILE), "{not json").unwrap();
        let err = KnowledgeBase::load(dir.path()).unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse(file, _) if file == "symptoms.json"));
    }
}
