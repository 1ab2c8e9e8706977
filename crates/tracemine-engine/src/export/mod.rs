//! Encodings of a corpus for downstream sequence and graph learning.
//!
//! Both encoders read the snapshot directly and share only the classifier
//! with the rest of the engine.

mod graph;
mod sequences;
mod vocabulary;

pub use graph::{
    FEATURE_NAMES, GraphEdge, GraphNode, TemporalGraph, TransitionPair, export_for_tgnn,
};
pub use sequences::{TrainingExport, TrainingSequence, export_sequences_for_training};
pub use vocabulary::Vocabulary;
