use super::emit;
use crate::args::ExportFormat;
use anyhow::Result;
use std::path::Path;
use tracemine_engine::TraceAnalyzer;
use tracemine_types::TraceSource;

pub fn handle<S: TraceSource>(
    analyzer: &TraceAnalyzer<'_, S>,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    match format {
        ExportFormat::Tokens => emit(&analyzer.export_sequences_for_training(), output),
        ExportFormat::Graph => emit(&analyzer.export_for_tgnn(), output),
    }
}
