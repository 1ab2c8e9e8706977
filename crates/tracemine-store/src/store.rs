use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracemine_types::{ActionRecord, Corpus, SkippedRecord};
use walkdir::WalkDir;

use crate::parser::parse_record;
use crate::{Error, Result};

/// Trace store backed by a directory of append-only `.jsonl` files.
///
/// Each line is one action record. Session boundaries come from the
/// `session_id` field alone, so a session may span several files.
#[derive(Debug, Clone)]
pub struct JsonlTraceStore {
    root: PathBuf,
}

impl JsonlTraceStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::TraceDirNotFound(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All trace files under the root, in path order
    pub fn trace_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "jsonl") {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }

    /// Read every trace file into an immutable [`Corpus`].
    ///
    /// Each file is read only up to the length it had when the read started,
    /// so records appended by a live writer during the read are left for the
    /// next snapshot. A file that shrinks during the read fails the whole
    /// snapshot with [`Error::SnapshotInconsistency`].
    pub fn snapshot(&self) -> Result<Corpus> {
        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for path in self.trace_files()? {
            let bytes = read_snapshot_bytes(&path)?;
            parse_lines(&path, &bytes, &mut records, &mut skipped);
        }

        if !skipped.is_empty() {
            tracing::warn!(
                skipped = skipped.len(),
                root = %self.root.display(),
                "some trace records were skipped"
            );
        }
        tracing::debug!(records = records.len(), "trace snapshot loaded");

        Ok(Corpus::from_records(records, skipped))
    }
}

fn read_snapshot_bytes(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let expected = file.metadata()?.len();
    read_snapshot_bytes_from(path, &mut file, expected, |f: &File| {
        f.metadata().map(|m| m.len())
    })
}

/// Read `expected` bytes, then re-check the source length with `current_len`.
/// A source that came up short, or shrank while being read, is inconsistent.
fn read_snapshot_bytes_from<R: Read>(
    path: &Path,
    reader: &mut R,
    expected: u64,
    current_len: impl FnOnce(&R) -> std::io::Result<u64>,
) -> Result<Vec<u8>> {
    let bytes = read_prefix(reader, expected)?;
    verify_len(path, expected, bytes.len() as u64)?;

    let after = current_len(&*reader)?;
    verify_len(path, expected, after)?;

    Ok(bytes)
}

fn read_prefix(reader: &mut impl Read, len: u64) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len as usize);
    reader.take(len).read_to_end(&mut buf)?;
    Ok(buf)
}

fn verify_len(path: &Path, expected: u64, actual: u64) -> Result<()> {
    if actual < expected {
        return Err(Error::SnapshotInconsistency {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn parse_lines(
    path: &Path,
    bytes: &[u8],
    records: &mut Vec<ActionRecord>,
    skipped: &mut Vec<SkippedRecord>,
) {
    let terminated = bytes.ends_with(b"\n");
    let lines: Vec<&[u8]> = bytes.split(|b| *b == b'\n').collect();
    let last = lines.len().saturating_sub(1);

    for (idx, raw) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let reason = match std::str::from_utf8(raw) {
            Ok(text) if text.trim().is_empty() => continue,
            Ok(text) => match parse_record(text.trim()) {
                Ok(record) => {
                    records.push(record);
                    continue;
                }
                Err(err) => err.to_string(),
            },
            Err(_) => "invalid UTF-8".to_string(),
        };

        if idx == last && !terminated {
            tracing::debug!(
                path = %path.display(),
                line = line_no,
                "ignoring incomplete trailing line"
            );
            continue;
        }

        tracing::warn!(
            path = %path.display(),
            line = line_no,
            %reason,
            "skipping malformed trace record"
        );
        skipped.push(SkippedRecord {
            source: path.display().to_string(),
            line: Some(line_no),
            reason,
        });
    }
}
