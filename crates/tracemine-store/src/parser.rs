use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracemine_types::{ActionRecord, parse_timestamp};

/// Why a log line could not become an [`ActionRecord`]
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unparseable timestamp `{0}`")]
    InvalidTimestamp(String),
}

/// Line shape as written by the capture proxy. Every field is optional here
/// so that a missing field can be reported by name.
#[derive(Debug, Deserialize)]
struct RawRecord {
    trace_id: Option<String>,
    session_id: Option<String>,
    #[serde(alias = "sequence")]
    sequence_num: Option<u64>,
    timestamp: Option<String>,
    tool: Option<String>,
    inputs: Option<Map<String, Value>>,
    output: Option<Value>,
    success: Option<bool>,
    duration_ms: Option<f64>,
    goal: Option<String>,
    error: Option<String>,
}

/// Parse one JSONL line into a validated record.
///
/// A negative or non-integer `sequence_num` fails JSON decoding and is
/// reported as [`RecordError::Json`]. Lines without a `trace_id` get
/// `"{session_id}:{sequence_num}"`, which is unique within a store.
pub fn parse_record(line: &str) -> Result<ActionRecord, RecordError> {
    let raw: RawRecord = serde_json::from_str(line)?;

    let timestamp_raw = raw.timestamp.ok_or(RecordError::MissingField("timestamp"))?;
    let timestamp =
        parse_timestamp(&timestamp_raw).ok_or(RecordError::InvalidTimestamp(timestamp_raw))?;

    let session_id = raw.session_id.ok_or(RecordError::MissingField("session_id"))?;
    let sequence_num = raw
        .sequence_num
        .ok_or(RecordError::MissingField("sequence_num"))?;
    let trace_id = raw
        .trace_id
        .unwrap_or_else(|| format!("{session_id}:{sequence_num}"));

    Ok(ActionRecord {
        trace_id,
        session_id,
        sequence_num,
        timestamp,
        tool: raw.tool.ok_or(RecordError::MissingField("tool"))?,
        inputs: raw.inputs.ok_or(RecordError::MissingField("inputs"))?,
        output: raw.output.ok_or(RecordError::MissingField("output"))?,
        success: raw.success.ok_or(RecordError::MissingField("success"))?,
        duration_ms: raw.duration_ms,
        goal: raw.goal,
        error: raw.error,
    })
}
