use super::emit;
use anyhow::Result;
use serde::Serialize;
use tracemine_engine::{MiningParams, Motif, TraceAnalyzer};
use tracemine_types::TraceSource;

#[derive(Serialize)]
struct PatternsReport<'a> {
    params: &'a MiningParams,
    motifs: Vec<Motif>,
}

pub fn handle<S: TraceSource>(
    analyzer: &TraceAnalyzer<'_, S>,
    params: &MiningParams,
) -> Result<()> {
    let motifs = analyzer.mine_sequences(params)?;
    emit(&PatternsReport { params, motifs }, None)
}
