use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dense label to integer id mapping.
///
/// Ids are assigned `0..n` in the order labels were supplied and serialize
/// as a plain array of labels, so the array index is the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    labels: Vec<String>,
    ids: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build from labels in id order. Repeated labels keep their first id.
    pub fn new<I, L>(labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let mut vocab = Self::default();
        for label in labels {
            let label = label.into();
            if !vocab.ids.contains_key(&label) {
                vocab.ids.insert(label.clone(), vocab.labels.len());
                vocab.labels.push(label);
            }
        }
        vocab
    }

    pub fn id(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    pub fn label(&self, id: usize) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Encode labels; `None` if any label is outside the vocabulary.
    pub fn encode<'a, I>(&self, labels: I) -> Option<Vec<usize>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels.into_iter().map(|l| self.id(l)).collect()
    }

    /// Decode token ids back to labels; `None` on an unknown id.
    pub fn decode(&self, tokens: &[usize]) -> Option<Vec<&str>> {
        tokens.iter().map(|&id| self.label(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(labels: Vec<String>) -> Self {
        Self::new(labels)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.labels
    }
}
