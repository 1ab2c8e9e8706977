//! tracemine: command-line front end for the trace analysis engine.
//!
//! Every subcommand takes a fresh snapshot of the trace directory, runs one
//! analysis and prints the result as JSON on stdout. Diagnostics go to
//! stderr through `tracing`.

mod args;
mod commands;
pub mod config;
mod handlers;
mod logging;

pub use args::{Cli, Commands, ExportFormat, LogLevel};
pub use commands::run;
