use super::emit;
use anyhow::Result;
use tracemine_engine::{Granularity, TraceAnalyzer};
use tracemine_types::TraceSource;

pub fn handle<S: TraceSource>(
    analyzer: &TraceAnalyzer<'_, S>,
    granularity: Granularity,
) -> Result<()> {
    emit(&analyzer.transition_probabilities(granularity), None)
}
