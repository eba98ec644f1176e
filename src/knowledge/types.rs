use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::KnowledgeError;

// ---------------------------------------------------------------------------
// SymptomEntry
// ---------------------------------------------------------------------------

/// A normalized symptom with every surface form it is known by.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymptomEntry {
    pub id: String,
    /// Never empty. The first phrase is the canonical display name.
    pub synonyms: Vec<String>,
}

impl SymptomEntry {
    /// Build an entry, trimming phrases and dropping blank ones.
    pub fn new(id: impl Into<String>, synonyms: Vec<String>) -> Result<Self, KnowledgeError> {
        let id = id.into();
        let synonyms: Vec<String> = synonyms
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if synonyms.is_empty() {
            return Err(KnowledgeError::EmptySynonyms(id));
        }
        Ok(Self { id, synonyms })
    }

    pub fn display_name(&self) -> &str {
        self.synonyms.first().map(String::as_str).unwrap_or(&self.id)
    }
}

/// On-disk shape of a symptom value: a lone phrase or a list of phrases.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SynonymValue {
    One(String),
    Many(Vec<String>),
}

impl SynonymValue {
    pub fn into_synonyms(self) -> Vec<String> {
        match self {
            Self::One(phrase) => vec![phrase],
            Self::Many(phrases) => phrases,
        }
    }
}

// ---------------------------------------------------------------------------
// ConditionProfile
// ---------------------------------------------------------------------------

/// A condition label and the symptom ids it was observed with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionProfile {
    pub name: String,
    pub associated_symptoms: BTreeSet<String>,
}

impl ConditionProfile {
    pub fn new<I, S>(name: impl Into<String>, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            associated_symptoms: symptoms.into_iter().map(Into::into).collect(),
        }
    }
}
