//! Builders for action records and corpora.
//!
//! Timestamps are derived from a fixed base time and trace ids from the
//! session id and sequence number, so fixtures are fully deterministic.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Map, Value};
use tracemine_types::{ActionRecord, Corpus};

/// 2025-01-01T00:00:00Z
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

/// Fluent builder for a single [`ActionRecord`].
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: ActionRecord,
}

impl RecordBuilder {
    /// Successful action at `base_time() + seq seconds` with empty inputs.
    pub fn new(session_id: &str, sequence_num: u64, tool: &str) -> Self {
        Self {
            record: ActionRecord {
                trace_id: format!("{session_id}-{sequence_num:04}"),
                session_id: session_id.to_string(),
                sequence_num,
                timestamp: base_time() + Duration::seconds(sequence_num as i64),
                tool: tool.to_string(),
                inputs: Map::new(),
                output: Value::String(format!("{tool} ok")),
                success: true,
                duration_ms: None,
                goal: None,
                error: None,
            },
        }
    }

    pub fn failed(mut self, error: &str) -> Self {
        self.record.success = false;
        self.record.error = Some(error.to_string());
        self
    }

    pub fn duration_ms(mut self, ms: f64) -> Self {
        self.record.duration_ms = Some(ms);
        self
    }

    pub fn goal(mut self, goal: &str) -> Self {
        self.record.goal = Some(goal.to_string());
        self
    }

    /// Place the action `ms` milliseconds after the base time
    pub fn at_ms(mut self, ms: i64) -> Self {
        self.record.timestamp = base_time() + Duration::milliseconds(ms);
        self
    }

    pub fn input(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.record.inputs.insert(key.to_string(), value.into());
        self
    }

    pub fn output(mut self, output: impl Into<Value>) -> Self {
        self.record.output = output.into();
        self
    }

    pub fn build(self) -> ActionRecord {
        self.record
    }
}

/// Successful records for `tools`, in order, one second apart
pub fn session_records(session_id: &str, tools: &[&str]) -> Vec<ActionRecord> {
    tools
        .iter()
        .enumerate()
        .map(|(i, tool)| RecordBuilder::new(session_id, i as u64, tool).build())
        .collect()
}

/// Corpus with one session per `(session_id, tools)` entry
pub fn corpus_of(sessions: &[(&str, &[&str])]) -> Corpus {
    let records = sessions
        .iter()
        .flat_map(|(id, tools)| session_records(id, tools));
    Corpus::from_records(records, Vec::new())
}
