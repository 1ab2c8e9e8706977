use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracemine_types::{Classifier, Modality, ToolType, TraceSource};

/// Names of the entries of [`GraphNode::features`], in order
pub const FEATURE_NAMES: [&str; 10] = [
    "touch",
    "vision",
    "taste",
    "motor",
    "proprio",
    "pain",
    "unknown",
    "success",
    "duration_normalized",
    "temporal_position",
];

/// Per-action graph encoding for temporal graph learning.
///
/// Each action is a node; consecutive actions of the same session are joined
/// by a directed temporal edge. Edges never connect different sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalGraph {
    /// Modality labels in one-hot order
    pub categories: Vec<String>,
    pub feature_names: Vec<String>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Global, dense in (session id, sequence) order
    pub id: usize,
    pub session_id: String,
    pub sequence_num: u64,
    pub trace_id: String,
    pub tool: String,
    pub tool_type: ToolType,
    pub category: Modality,
    pub category_index: usize,
    pub success: bool,
    pub duration_ms: Option<f64>,
    /// Duration over the corpus maximum; 0.0 when unknown
    pub duration_normalized: f64,
    /// Position within the session as `i / len`
    pub temporal_position: f64,
    pub timestamp: DateTime<Utc>,
    pub files_count: usize,
    pub output_length: usize,
    pub output_digest: String,
    pub features: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionPair {
    pub from: Modality,
    pub to: Modality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub session_id: String,
    pub transition: TransitionPair,
    pub weight: f64,
    /// Timestamp of the target action
    pub timestamp: DateTime<Utc>,
    /// Time between source and target actions
    pub delta_ms: i64,
}

impl TemporalGraph {
    pub fn node(&self, id: usize) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Edges leaving `id`
    pub fn outgoing(&self, id: usize) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.source == id)
    }
}

pub fn export_for_tgnn<S: TraceSource>(source: &S, classifier: &Classifier) -> TemporalGraph {
    let max_duration = source
        .sessions()
        .flat_map(|s| s.records.iter().filter_map(|r| r.duration_ms))
        .fold(0.0_f64, f64::max);

    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for session in source.sessions() {
        let len = session.len();

        for (i, record) in session.records.iter().enumerate() {
            let id = nodes.len();
            let category = record.modality(classifier);

            let duration_normalized = match record.duration_ms {
                Some(ms) if max_duration > 0.0 => ms / max_duration,
                _ => 0.0,
            };
            let temporal_position = i as f64 / len as f64;

            let mut features = category.one_hot().to_vec();
            features.push(if record.success { 1.0 } else { 0.0 });
            features.push(duration_normalized);
            features.push(temporal_position);

            if i > 0 {
                let prev: &GraphNode = &nodes[id - 1];
                edges.push(GraphEdge {
                    source: prev.id,
                    target: id,
                    session_id: session.session_id.clone(),
                    transition: TransitionPair {
                        from: prev.category,
                        to: category,
                    },
                    weight: 1.0,
                    timestamp: record.timestamp,
                    delta_ms: (record.timestamp - prev.timestamp).num_milliseconds(),
                });
            }

            nodes.push(GraphNode {
                id,
                session_id: session.session_id.clone(),
                sequence_num: record.sequence_num,
                trace_id: record.trace_id.clone(),
                tool: record.tool.clone(),
                tool_type: ToolType::from_tool_name(&record.tool),
                category,
                category_index: category.index(),
                success: record.success,
                duration_ms: record.duration_ms,
                duration_normalized,
                temporal_position,
                timestamp: record.timestamp,
                files_count: record.files_touched().len(),
                output_length: record.output_len(),
                output_digest: record.output_digest(),
                features,
            });
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        "exported temporal graph"
    );

    TemporalGraph {
        categories: Modality::ALL.iter().map(|m| m.to_string()).collect(),
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        nodes,
        edges,
    }
}
