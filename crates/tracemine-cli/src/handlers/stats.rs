use super::emit;
use anyhow::Result;
use tracemine_engine::TraceAnalyzer;
use tracemine_types::TraceSource;

pub fn handle<S: TraceSource>(
    analyzer: &TraceAnalyzer<'_, S>,
    session: Option<&str>,
) -> Result<()> {
    match session {
        Some(id) => {
            let Some(stats) = analyzer.session_stats(id) else {
                anyhow::bail!("Session not found: {}", id);
            };
            emit(&stats, None)
        }
        None => emit(&analyzer.overall_stats(), None),
    }
}
