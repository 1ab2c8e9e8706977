//! First-order transition model over consecutive in-session actions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracemine_types::{Classifier, TraceSource};

use crate::granularity::Granularity;

/// Counts keyed by previous label, then next label
pub type TransitionCounts = BTreeMap<String, BTreeMap<String, usize>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub count: usize,
    pub probability: f64,
}

/// Outgoing transitions of one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRow {
    pub total: usize,
    pub next: BTreeMap<String, Transition>,
}

/// Normalized transition table.
///
/// Only labels with at least one observed successor have a row. Labels that
/// were seen but never followed by another action (session tails, single
/// action sessions) are listed in `terminal_labels` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionModel {
    pub granularity: Granularity,
    pub transitions: BTreeMap<String, TransitionRow>,
    pub terminal_labels: BTreeSet<String>,
}

impl TransitionModel {
    /// Next-label distribution for `label`; empty when it has no successors.
    pub fn distribution(&self, label: &str) -> BTreeMap<String, f64> {
        self.transitions
            .get(label)
            .map(|row| {
                row.next
                    .iter()
                    .map(|(next, t)| (next.clone(), t.probability))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn probability(&self, from: &str, to: &str) -> f64 {
        self.transitions
            .get(from)
            .and_then(|row| row.next.get(to))
            .map_or(0.0, |t| t.probability)
    }
}

pub fn transition_counts<S: TraceSource>(
    source: &S,
    classifier: &Classifier,
    granularity: Granularity,
) -> TransitionCounts {
    let mut counts = TransitionCounts::new();

    for session in source.sessions() {
        let labels = granularity.labels(session, classifier);
        for pair in labels.windows(2) {
            *counts
                .entry(pair[0].to_string())
                .or_default()
                .entry(pair[1].to_string())
                .or_insert(0) += 1;
        }
    }

    counts
}

pub fn transition_probabilities<S: TraceSource>(
    source: &S,
    classifier: &Classifier,
    granularity: Granularity,
) -> TransitionModel {
    let counts = transition_counts(source, classifier, granularity);

    let mut seen = BTreeSet::new();
    for session in source.sessions() {
        seen.extend(
            granularity
                .labels(session, classifier)
                .into_iter()
                .map(str::to_string),
        );
    }

    let transitions: BTreeMap<String, TransitionRow> = counts
        .into_iter()
        .map(|(from, next_counts)| {
            let total: usize = next_counts.values().sum();
            let next = next_counts
                .into_iter()
                .map(|(to, count)| {
                    let probability = count as f64 / total as f64;
                    (to, Transition { count, probability })
                })
                .collect();
            (from, TransitionRow { total, next })
        })
        .collect();

    let terminal_labels = seen
        .into_iter()
        .filter(|label| !transitions.contains_key(label))
        .collect();

    tracing::debug!(
        rows = transitions.len(),
        granularity = ?granularity,
        "built transition model"
    );

    TransitionModel {
        granularity,
        transitions,
        terminal_labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracemine_testing::{RecordBuilder, corpus_of};
    use tracemine_types::Corpus;

    #[test]
    fn test_counts_stay_within_sessions() {
        let corpus = corpus_of(&[("a", &["bash", "view"]), ("b", &["edit", "bash"])]);
        let counts = transition_counts(&corpus, &Classifier::default(), Granularity::Tool);

        assert_eq!(counts["bash"]["view"], 1);
        assert_eq!(counts["edit"]["bash"], 1);
        assert!(!counts.contains_key("view"));
        assert_eq!(counts.values().map(|r| r.values().sum::<usize>()).sum::<usize>(), 2);
    }

    #[test]
    fn test_rows_sum_to_one() {
        let corpus = corpus_of(&[
            ("a", &["bash", "view", "bash", "edit", "bash", "view"]),
            ("b", &["view", "view", "edit"]),
        ]);
        let model = transition_probabilities(&corpus, &Classifier::default(), Granularity::Tool);

        for row in model.transitions.values() {
            let sum: f64 = row.next.values().map(|t| t.probability).sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
        assert_eq!(model.transitions["bash"].total, 3);
        assert!((model.probability("bash", "view") - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(model.probability("edit", "view"), 0.0);
    }

    #[test]
    fn test_single_action_session_has_no_row() {
        let corpus = corpus_of(&[("a", &["web_fetch"])]);
        let model = transition_probabilities(&corpus, &Classifier::default(), Granularity::Tool);

        assert!(model.transitions.is_empty());
        assert!(model.terminal_labels.contains("web_fetch"));
        assert!(model.distribution("web_fetch").is_empty());
    }

    #[test]
    fn test_modality_rows() {
        let corpus = Corpus::from_records(
            vec![
                RecordBuilder::new("a", 0, "view").build(),
                RecordBuilder::new("a", 1, "bash").failed("boom").build(),
                RecordBuilder::new("a", 2, "str_replace").build(),
            ],
            vec![],
        );
        let model =
            transition_probabilities(&corpus, &Classifier::default(), Granularity::Modality);

        assert_eq!(model.probability("touch", "pain"), 1.0);
        assert_eq!(model.probability("pain", "motor"), 1.0);
        assert_eq!(model.terminal_labels.iter().collect::<Vec<_>>(), vec!["motor"]);
    }

    #[test]
    fn test_empty_corpus() {
        let model =
            transition_probabilities(&Corpus::empty(), &Classifier::default(), Granularity::Tool);
        assert!(model.transitions.is_empty());
        assert!(model.terminal_labels.is_empty());
    }
}
