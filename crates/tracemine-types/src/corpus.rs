use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::record::ActionRecord;
use crate::session::Session;

/// A record that could not be used and was left out of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Where the record came from (file path, or `session <id>`)
    pub source: String,
    /// 1-based line number when the record came from a line-oriented file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub reason: String,
}

/// Read access to a session-grouped trace collection.
///
/// Implementations must present one consistent snapshot for as long as the
/// borrow lives.
pub trait TraceSource {
    /// Sessions in ascending `session_id` order
    fn sessions(&self) -> impl Iterator<Item = &Session>;

    fn session(&self, session_id: &str) -> Option<&Session>;

    /// Records dropped while building the snapshot
    fn skipped(&self) -> &[SkippedRecord] {
        &[]
    }

    fn record_count(&self) -> usize {
        self.sessions().map(Session::len).sum()
    }
}

/// Immutable, point-in-time view of every session in a trace store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    sessions: BTreeMap<String, Session>,
    skipped: Vec<SkippedRecord>,
}

impl Corpus {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Group records into sessions.
    ///
    /// Within a session the first record seen for a sequence number wins;
    /// later duplicates are added to the skipped list. Sequence numbers must
    /// run contiguously from 0: records past the first gap are out of range
    /// and skipped, so no two actions on either side of a hole become
    /// neighbours. A session left with no records is dropped. Timestamps
    /// that run backwards are kept but logged.
    pub fn from_records(
        records: impl IntoIterator<Item = ActionRecord>,
        mut skipped: Vec<SkippedRecord>,
    ) -> Self {
        let mut grouped: BTreeMap<String, Vec<ActionRecord>> = BTreeMap::new();
        let mut seen: HashSet<(String, u64)> = HashSet::new();

        for record in records {
            let key = (record.session_id.clone(), record.sequence_num);
            if !seen.insert(key) {
                tracing::warn!(
                    session_id = %record.session_id,
                    sequence_num = record.sequence_num,
                    trace_id = %record.trace_id,
                    "skipping record with duplicate sequence number"
                );
                skipped.push(SkippedRecord {
                    source: format!("session {}", record.session_id),
                    line: None,
                    reason: format!(
                        "duplicate sequence_num {} (trace {})",
                        record.sequence_num, record.trace_id
                    ),
                });
                continue;
            }
            grouped
                .entry(record.session_id.clone())
                .or_default()
                .push(record);
        }

        let mut sessions = BTreeMap::new();
        for (id, mut records) in grouped {
            records.sort_by_key(|r| r.sequence_num);
            let contiguous = records
                .iter()
                .enumerate()
                .take_while(|(position, r)| r.sequence_num == *position as u64)
                .count();

            for record in records.drain(contiguous..) {
                tracing::warn!(
                    session_id = %record.session_id,
                    sequence_num = record.sequence_num,
                    expected = contiguous,
                    "skipping record with out-of-range sequence number"
                );
                skipped.push(SkippedRecord {
                    source: format!("session {}", record.session_id),
                    line: None,
                    reason: format!(
                        "sequence_num {} out of range (session is contiguous up to {})",
                        record.sequence_num, contiguous
                    ),
                });
            }

            if records.is_empty() {
                continue;
            }
            let session = Session::new(id.clone(), records);
            check_timestamps(&session);
            sessions.insert(id, session);
        }

        Self { sessions, skipped }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl TraceSource for Corpus {
    fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }
}

fn check_timestamps(session: &Session) {
    if let Some(pair) = session
        .records
        .windows(2)
        .find(|w| w[1].timestamp < w[0].timestamp)
    {
        tracing::warn!(
            session_id = %session.session_id,
            sequence_num = pair[1].sequence_num,
            "timestamp goes backwards within session"
        );
    }
}
