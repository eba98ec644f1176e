use std::collections::HashMap;

/// Ordered list of every symptom id the classifier knows, with O(1) lookup.
/// Position in the list is the feature index.
#[derive(Debug, Clone, Default)]
pub struct SymptomSpace {
    ids: Vec<String>,
    index: HashMap<String, usize>,
}

impl SymptomSpace {
    /// Build a space; repeated ids keep their first position.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut space = Self::default();
        for id in ids {
            let id = id.into();
            if space.index.contains_key(&id) {
                continue;
            }
            space.index.insert(id.clone(), space.ids.len());
            space.ids.push(id);
        }
        space
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Fresh presence vector with 1 for every known id. Unknown ids are ignored.
    pub fn presence<I, S>(&self, ids: I) -> PresenceVector
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        PresenceVector::zeros(self.len()).union(self, ids)
    }
}

/// Binary symptom indicator over a whole `SymptomSpace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceVector {
    values: Vec<u8>,
}

impl PresenceVector {
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0; len],
        }
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0).count()
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.values.get(index).is_some_and(|&v| v != 0)
    }

    /// Ids set to 1, in space order.
    pub fn active_ids<'s>(&self, space: &'s SymptomSpace) -> Vec<&'s str> {
        space
            .ids()
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| **v != 0)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Copy with the given ids also set. Never clears a set position.
    pub fn union<I, S>(&self, space: &SymptomSpace, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut next = self.clone();
        for id in ids {
            if let Some(pos) = space.position(id.as_ref()) {
                if let Some(slot) = next.values.get_mut(pos) {
                    *slot = 1;
                }
            }
        }
        next
    }

    /// True when every position set in `other` is also set here.
    pub fn is_superset_of(&self, other: &PresenceVector) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(&mine, &theirs)| theirs == 0 || mine != 0)
    }
}
