// ============================================================
// Layer 3 — Symptom Vocabulary & Disease Label Set
// ============================================================
// Both types are frozen, ordered index mappings. Indices are
// positional at the tensor boundary, so training and inference
// must share the exact same ordering — the vocabulary and label
// set derived at training time are serialized into the model
// artifact and rebuilt from it when serving.

use std::collections::HashMap;

/// Ordered list of recognized symptom names. Position i in the list is
/// position i in every input vector, for both training and inference.
///
/// A duplicate header name collapses to one index — last writer wins,
/// by definition of a mapping — while the vector length stays equal to
/// the header column count.
#[derive(Debug, Clone)]
pub struct SymptomVocabulary {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl SymptomVocabulary {
    /// Build the vocabulary from the non-label header columns, in file order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            index.insert(name.clone(), i);
        }
        Self { names, index }
    }

    /// Input-vector width N.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a symptom name, or None if it is not representable.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// All symptom names in vector order.
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    /// Turn a set of selected symptom names into an N-length {0,1} vector.
    ///
    /// Names absent from the vocabulary are never an error: they are
    /// collected into the second tuple element so callers can surface a
    /// structured "symptoms ignored" diagnostic, and they leave every
    /// known position untouched.
    pub fn vectorize<S: AsRef<str>>(&self, selected: &[S]) -> (Vec<f32>, Vec<String>) {
        let mut features = vec![0.0f32; self.names.len()];
        let mut ignored = Vec::new();
        for symptom in selected {
            match self.index_of(symptom.as_ref()) {
                Some(i) => features[i] = 1.0,
                None => ignored.push(symptom.as_ref().to_string()),
            }
        }
        (features, ignored)
    }
}

/// Ordered, de-duplicated disease names in first-occurrence order.
/// Position i in the set is position i in every output vector.
#[derive(Debug, Clone)]
pub struct DiseaseLabelSet {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl DiseaseLabelSet {
    /// Collect unique labels in order of first appearance.
    pub fn from_labels<S: AsRef<str>, I: IntoIterator<Item = S>>(labels: I) -> Self {
        let mut set = Self {
            labels: Vec::new(),
            index: HashMap::new(),
        };
        for label in labels {
            let label = label.as_ref();
            if !set.index.contains_key(label) {
                set.index.insert(label.to_string(), set.labels.len());
                set.labels.push(label.to_string());
            }
        }
        set
    }

    /// Output-vector width M.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of a disease label, or None if absent.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Disease name at a given output-vector position.
    pub fn name_of(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// All disease names in first-occurrence order.
    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}
