//! Recurring ordered subsequences ("motifs") of action labels.
//!
//! Every session is scanned with sliding windows of each length in the
//! requested range. Windows never cross a session boundary, and counts are
//! pooled over the whole corpus.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracemine_types::{Classifier, TraceSource};

use crate::granularity::Granularity;
use crate::{Error, Result};

/// How many session ids a motif carries as examples
pub const MAX_EXAMPLE_SESSIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningParams {
    /// Minimum pooled occurrence count for a motif to be reported
    pub min_frequency: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub granularity: Granularity,
}

impl Default for MiningParams {
    fn default() -> Self {
        Self {
            min_frequency: 2,
            min_length: 2,
            max_length: 5,
            granularity: Granularity::Tool,
        }
    }
}

impl MiningParams {
    pub fn new(min_frequency: usize, min_length: usize, max_length: usize) -> Self {
        Self {
            min_frequency,
            min_length,
            max_length,
            granularity: Granularity::Tool,
        }
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_frequency < 1 {
            return Err(Error::InvalidParameter(format!(
                "min_frequency must be at least 1 (got {})",
                self.min_frequency
            )));
        }
        if self.min_length < 1 {
            return Err(Error::InvalidParameter(format!(
                "min_length must be at least 1 (got {})",
                self.min_length
            )));
        }
        if self.min_length > self.max_length {
            return Err(Error::InvalidParameter(format!(
                "min_length ({}) must not exceed max_length ({})",
                self.min_length, self.max_length
            )));
        }
        Ok(())
    }
}

/// A label subsequence that recurs across the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motif {
    pub pattern: Vec<String>,
    pub length: usize,
    /// Number of windows matching the pattern, pooled over sessions
    pub occurrences: usize,
    /// Number of distinct sessions containing the pattern
    pub session_count: usize,
    /// Up to [`MAX_EXAMPLE_SESSIONS`] session ids, sorted
    pub example_sessions: Vec<String>,
    /// Mean time from the first to the last action of a matching window
    pub avg_span_ms: f64,
}

#[derive(Default)]
struct Accumulator<'a> {
    occurrences: usize,
    sessions: BTreeSet<&'a str>,
    span_total_ms: i64,
}

/// Find every motif satisfying `params`.
///
/// Results are ordered by occurrences (descending), then length
/// (descending), then pattern (lexicographic over labels).
pub fn mine_sequences<S: TraceSource>(
    source: &S,
    classifier: &Classifier,
    params: &MiningParams,
) -> Result<Vec<Motif>> {
    params.validate()?;

    let mut candidates: HashMap<Vec<&str>, Accumulator<'_>> = HashMap::new();

    for session in source.sessions() {
        let labels = params.granularity.labels(session, classifier);

        for len in params.min_length..=params.max_length {
            if labels.len() < len {
                break;
            }

            for (start, window) in labels.windows(len).enumerate() {
                let first = &session.records[start];
                let last = &session.records[start + len - 1];

                let acc = candidates.entry(window.to_vec()).or_default();
                acc.occurrences += 1;
                acc.sessions.insert(session.session_id.as_str());
                acc.span_total_ms += (last.timestamp - first.timestamp).num_milliseconds();
            }
        }
    }

    let mut motifs: Vec<Motif> = candidates
        .into_iter()
        .filter(|(_, acc)| acc.occurrences >= params.min_frequency)
        .map(|(pattern, acc)| Motif {
            length: pattern.len(),
            pattern: pattern.into_iter().map(str::to_string).collect(),
            occurrences: acc.occurrences,
            session_count: acc.sessions.len(),
            example_sessions: acc
                .sessions
                .iter()
                .take(MAX_EXAMPLE_SESSIONS)
                .map(|s| s.to_string())
                .collect(),
            avg_span_ms: acc.span_total_ms as f64 / acc.occurrences as f64,
        })
        .collect();

    motifs.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then(b.length.cmp(&a.length))
            .then_with(|| a.pattern.cmp(&b.pattern))
    });

    tracing::debug!(
        motifs = motifs.len(),
        granularity = ?params.granularity,
        "mined sequences"
    );

    Ok(motifs)
}
