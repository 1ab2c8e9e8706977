use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracemine_types::{Classifier, Modality, TraceSource};

/// Count of actions and how many of them failed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub count: usize,
    pub failures: usize,
    pub success_rate: Option<f64>,
}

impl Tally {
    fn add(&mut self, success: bool) {
        self.count += 1;
        if !success {
            self.failures += 1;
        }
        self.success_rate = Some((self.count - self.failures) as f64 / self.count as f64);
    }
}

/// Corpus-wide statistics.
///
/// On an empty corpus every count is zero and every rate or average is
/// `None` (`avg_actions_per_session` is `0.0`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_actions: usize,
    pub session_count: usize,
    pub by_tool: BTreeMap<String, Tally>,
    pub by_modality: BTreeMap<Modality, Tally>,
    pub by_session: BTreeMap<String, Tally>,
    pub successes: usize,
    pub failures: usize,
    pub success_rate: Option<f64>,
    /// Mean over actions that recorded a duration
    pub avg_duration_ms: Option<f64>,
    pub total_duration_ms: f64,
    pub input_tokens_est: u64,
    pub output_tokens_est: u64,
    /// From the earliest to the latest action in the corpus
    pub time_span_ms: Option<i64>,
    pub avg_actions_per_session: f64,
    /// Records dropped while the snapshot was built
    pub skipped_records: usize,
}

/// Statistics for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: String,
    pub goal: Option<String>,
    pub length: usize,
    pub duration_ms: Option<i64>,
    pub tools: BTreeMap<String, usize>,
    pub modalities: BTreeMap<Modality, usize>,
    pub unique_files: BTreeSet<String>,
    pub error_count: usize,
    pub success_rate: Option<f64>,
}

pub fn overall_stats<S: TraceSource>(source: &S, classifier: &Classifier) -> OverallStats {
    let mut stats = OverallStats {
        skipped_records: source.skipped().len(),
        ..OverallStats::default()
    };

    let mut durations = Vec::new();
    let mut first: Option<DateTime<Utc>> = None;
    let mut last: Option<DateTime<Utc>> = None;

    for session in source.sessions() {
        stats.session_count += 1;

        for record in &session.records {
            stats.total_actions += 1;
            if record.success {
                stats.successes += 1;
            } else {
                stats.failures += 1;
            }

            stats
                .by_tool
                .entry(record.tool.clone())
                .or_default()
                .add(record.success);
            stats
                .by_modality
                .entry(record.modality(classifier))
                .or_default()
                .add(record.success);
            stats
                .by_session
                .entry(session.session_id.clone())
                .or_default()
                .add(record.success);

            if let Some(ms) = record.duration_ms {
                durations.push(ms);
            }
            stats.input_tokens_est += record.input_tokens_est();
            stats.output_tokens_est += record.output_tokens_est();

            first = Some(first.map_or(record.timestamp, |t| t.min(record.timestamp)));
            last = Some(last.map_or(record.timestamp, |t| t.max(record.timestamp)));
        }
    }

    if stats.total_actions > 0 {
        stats.success_rate = Some(stats.successes as f64 / stats.total_actions as f64);
    }
    if stats.session_count > 0 {
        stats.avg_actions_per_session = stats.total_actions as f64 / stats.session_count as f64;
    }

    stats.total_duration_ms = durations.iter().sum();
    if !durations.is_empty() {
        stats.avg_duration_ms = Some(stats.total_duration_ms / durations.len() as f64);
    }

    if let (Some(first), Some(last)) = (first, last) {
        stats.time_span_ms = Some((last - first).num_milliseconds());
    }

    tracing::debug!(
        actions = stats.total_actions,
        sessions = stats.session_count,
        "computed overall stats"
    );

    stats
}

pub fn session_stats<S: TraceSource>(
    source: &S,
    classifier: &Classifier,
    session_id: &str,
) -> Option<SessionStats> {
    let session = source.session(session_id)?;

    let mut tools = BTreeMap::new();
    let mut modalities = BTreeMap::new();
    let mut unique_files = BTreeSet::new();

    for record in &session.records {
        *tools.entry(record.tool.clone()).or_insert(0) += 1;
        *modalities.entry(record.modality(classifier)).or_insert(0) += 1;
        unique_files.extend(record.files_touched());
    }

    Some(SessionStats {
        session_id: session.session_id.clone(),
        goal: session.goal.clone(),
        length: session.len(),
        duration_ms: session.duration_ms(),
        tools,
        modalities,
        unique_files,
        error_count: session.records.iter().filter(|r| !r.success).count(),
        success_rate: session.success_rate(),
    })
}
