//! Testing infrastructure for tracemine integration tests.
//!
//! - `TraceWorld`: isolated trace directory with helpers to write logs and
//!   run the CLI against them
//! - `fixtures`: builders for action records and whole sessions
//! - `assertions`: checks over CLI JSON output

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::{RecordBuilder, corpus_of, session_records};
pub use world::{CliResult, TraceWorld};
