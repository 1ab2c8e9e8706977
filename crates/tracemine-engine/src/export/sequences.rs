use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracemine_types::{Classifier, Modality, TraceSource};

use super::Vocabulary;

/// Token-sequence encoding of a corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExport {
    /// Every distinct tool in the corpus, sorted
    pub tool_vocabulary: Vocabulary,
    /// Modalities in one-hot order
    pub modality_vocabulary: Vocabulary,
    pub sequences: Vec<TrainingSequence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSequence {
    pub session_id: String,
    pub goal: Option<String>,
    pub length: usize,
    pub success_rate: Option<f64>,
    /// Tool ids in `tool_vocabulary`
    pub tokens: Vec<usize>,
    /// Modality ids in `modality_vocabulary`
    pub modality_tokens: Vec<usize>,
    pub timestamps: Vec<DateTime<Utc>>,
}

impl TrainingExport {
    /// Tool names of a sequence, decoded through the tool vocabulary
    pub fn decode_tools(&self, sequence: &TrainingSequence) -> Option<Vec<&str>> {
        self.tool_vocabulary.decode(&sequence.tokens)
    }
}

pub fn export_sequences_for_training<S: TraceSource>(
    source: &S,
    classifier: &Classifier,
) -> TrainingExport {
    let tools: BTreeSet<&str> = source
        .sessions()
        .flat_map(|s| s.records.iter().map(|r| r.tool.as_str()))
        .collect();
    let tool_ids: BTreeMap<&str, usize> = tools.iter().enumerate().map(|(i, t)| (*t, i)).collect();
    let tool_vocabulary = Vocabulary::new(tools);
    let modality_vocabulary = Vocabulary::new(Modality::ALL.iter().map(Modality::as_str));

    let sequences = source
        .sessions()
        .map(|session| TrainingSequence {
            session_id: session.session_id.clone(),
            goal: session.goal.clone(),
            length: session.len(),
            success_rate: session.success_rate(),
            // the vocabulary is built from these same sessions, so every tool has an id
            tokens: session
                .records
                .iter()
                .map(|r| tool_ids[r.tool.as_str()])
                .collect(),
            modality_tokens: session
                .modality_sequence(classifier)
                .iter()
                .map(Modality::index)
                .collect(),
            timestamps: session.records.iter().map(|r| r.timestamp).collect(),
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        sequences = sequences.len(),
        vocabulary = tool_vocabulary.len(),
        "exported training sequences"
    );

    TrainingExport {
        tool_vocabulary,
        modality_vocabulary,
        sequences,
    }
}
