//! JSONL trace store.
//!
//! Reads the append-only logs written by the capture proxy and produces an
//! immutable [`Corpus`](tracemine_types::Corpus) for analysis. Malformed
//! lines are skipped and reported on the corpus rather than failing the read.

pub mod error;
pub mod parser;
mod store;

pub use error::{Error, Result};
pub use parser::{RecordError, parse_record};
pub use store::JsonlTraceStore;
