use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::modality::{Classifier, Modality};
use crate::util;

/// A single logged agent action.
///
/// This is the unit of observation: the engine reads these and never
/// writes them back. The modality is not part of the record; it is
/// derived from `tool` (and `success`) by a [`Classifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Opaque unique identifier.
    pub trace_id: String,
    /// Agent run this action belongs to.
    pub session_id: String,
    /// Zero-based position within the session.
    #[serde(alias = "sequence")]
    pub sequence_num: u64,
    pub timestamp: DateTime<Utc>,
    /// Concrete tool name (e.g. `bash`, `view`).
    pub tool: String,
    #[serde(default)]
    pub inputs: Map<String, Value>,
    #[serde(default)]
    pub output: Value,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    /// The user's request for this run, when the logger recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionRecord {
    pub fn modality(&self, classifier: &Classifier) -> Modality {
        classifier.classify(&self.tool, self.success)
    }

    pub fn output_text(&self) -> String {
        util::value_text(&self.output)
    }

    /// Length of the output in characters
    pub fn output_len(&self) -> usize {
        self.output_text().chars().count()
    }

    pub fn output_digest(&self) -> String {
        util::short_digest(&self.output_text())
    }

    pub fn input_tokens_est(&self) -> u64 {
        let rendered = Value::Object(self.inputs.clone()).to_string();
        util::estimate_tokens(&rendered)
    }

    pub fn output_tokens_est(&self) -> u64 {
        util::estimate_tokens(&self.output_text())
    }

    pub fn files_touched(&self) -> BTreeSet<String> {
        util::extract_file_references(&self.inputs)
    }
}
