//! tracemine-engine: batch analyses over a snapshot of agent action traces.
//!
//! # Overview
//!
//! The engine answers four questions about a [`TraceSource`]:
//! - how many actions, failures and tokens per tool, modality and session
//!   ([`stats`]),
//! - which ordered label subsequences recur ([`motifs`]),
//! - how likely one label is to follow another ([`transitions`]),
//! - and how the corpus encodes for sequence or graph learning ([`export`]).
//!
//! Each analysis is a pure function of the snapshot and a [`Classifier`].
//! [`TraceAnalyzer`] bundles the two for convenience.
//!
//! # Quickstart
//!
//! ```
//! use tracemine_engine::{Granularity, MiningParams, TraceAnalyzer};
//! use tracemine_types::Corpus;
//!
//! let corpus = Corpus::empty();
//! let analyzer = TraceAnalyzer::new(&corpus);
//!
//! let stats = analyzer.overall_stats();
//! assert_eq!(stats.total_actions, 0);
//! assert_eq!(stats.success_rate, None);
//!
//! let motifs = analyzer.mine_sequences(&MiningParams::default()).unwrap();
//! assert!(motifs.is_empty());
//!
//! let model = analyzer.transition_probabilities(Granularity::Modality);
//! assert!(model.transitions.is_empty());
//! ```

pub mod error;
pub mod export;
pub mod granularity;
pub mod motifs;
pub mod stats;
pub mod transitions;

pub use error::{Error, Result};
pub use export::{
    GraphEdge, GraphNode, TemporalGraph, TrainingExport, TrainingSequence, TransitionPair,
    Vocabulary,
};
pub use granularity::Granularity;
pub use motifs::{MAX_EXAMPLE_SESSIONS, MiningParams, Motif};
pub use stats::{OverallStats, SessionStats, Tally};
pub use transitions::{Transition, TransitionCounts, TransitionModel, TransitionRow};

use tracemine_types::{Classifier, TraceSource};

/// Analyses bound to one snapshot and one classifier.
///
/// Borrows the source immutably, so any number of analyzers may run over
/// the same snapshot at once.
#[derive(Debug)]
pub struct TraceAnalyzer<'a, S> {
    source: &'a S,
    classifier: Classifier,
}

impl<'a, S: TraceSource> TraceAnalyzer<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            classifier: Classifier::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn overall_stats(&self) -> OverallStats {
        stats::overall_stats(self.source, &self.classifier)
    }

    /// `None` if the session is not in the snapshot
    pub fn session_stats(&self, session_id: &str) -> Option<SessionStats> {
        stats::session_stats(self.source, &self.classifier, session_id)
    }

    pub fn mine_sequences(&self, params: &MiningParams) -> Result<Vec<Motif>> {
        motifs::mine_sequences(self.source, &self.classifier, params)
    }

    /// Recurring tool-name subsequences
    pub fn find_tool_sequences(
        &self,
        min_frequency: usize,
        min_length: usize,
        max_length: usize,
    ) -> Result<Vec<Motif>> {
        let params = MiningParams::new(min_frequency, min_length, max_length);
        self.mine_sequences(&params)
    }

    /// Recurring modality subsequences
    pub fn find_modality_patterns(
        &self,
        min_frequency: usize,
        min_length: usize,
        max_length: usize,
    ) -> Result<Vec<Motif>> {
        let params = MiningParams::new(min_frequency, min_length, max_length)
            .with_granularity(Granularity::Modality);
        self.mine_sequences(&params)
    }

    pub fn transition_counts(&self, granularity: Granularity) -> TransitionCounts {
        transitions::transition_counts(self.source, &self.classifier, granularity)
    }

    pub fn transition_probabilities(&self, granularity: Granularity) -> TransitionModel {
        transitions::transition_probabilities(self.source, &self.classifier, granularity)
    }

    pub fn export_sequences_for_training(&self) -> TrainingExport {
        export::export_sequences_for_training(self.source, &self.classifier)
    }

    pub fn export_for_tgnn(&self) -> TemporalGraph {
        export::export_for_tgnn(self.source, &self.classifier)
    }
}
