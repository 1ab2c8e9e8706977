use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modality::{Classifier, Modality};
use crate::record::ActionRecord;

/// All actions of one agent run, ordered by `sequence_num`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    pub records: Vec<ActionRecord>,
}

impl Session {
    /// Build a session from records already belonging to it.
    ///
    /// Records are sorted by sequence number; the goal is taken from the
    /// first record that carries one.
    pub fn new(session_id: impl Into<String>, mut records: Vec<ActionRecord>) -> Self {
        records.sort_by_key(|r| r.sequence_num);
        let goal = records.iter().find_map(|r| r.goal.clone());
        Self {
            session_id: session_id.into(),
            goal,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.records.iter().map(|r| r.timestamp).min()
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.records.iter().map(|r| r.timestamp).max()
    }

    /// Wall-clock span between first and last action
    pub fn duration_ms(&self) -> Option<i64> {
        Some((self.end()? - self.start()?).num_milliseconds())
    }

    pub fn tool_sequence(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.tool.as_str()).collect()
    }

    pub fn modality_sequence(&self, classifier: &Classifier) -> Vec<Modality> {
        self.records.iter().map(|r| r.modality(classifier)).collect()
    }

    /// Fraction of successful actions; `None` for an empty session
    pub fn success_rate(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let ok = self.records.iter().filter(|r| r.success).count();
        Some(ok as f64 / self.records.len() as f64)
    }
}
