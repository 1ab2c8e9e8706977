use super::args::{Cli, Commands};
use super::handlers;
use crate::config::{self, Config};
use crate::logging;
use anyhow::{Context, Result};
use tracemine_engine::{Granularity, TraceAnalyzer};
use tracemine_store::JsonlTraceStore;
use tracemine_types::Corpus;

/// How many times a snapshot is retried when a trace file changes underneath it
const SNAPSHOT_ATTEMPTS: usize = 3;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)?;
    let trace_dir = config::resolve_trace_dir(cli.trace_dir.as_deref(), &config)?;

    let store = JsonlTraceStore::open(&trace_dir)
        .with_context(|| format!("Cannot open trace store at {}", trace_dir.display()))?;
    let corpus = take_snapshot(&store)?;
    let analyzer = TraceAnalyzer::new(&corpus).with_classifier(config.classifier());

    match cli.command {
        Commands::Stats { session } => handlers::stats::handle(&analyzer, session.as_deref()),

        Commands::Patterns {
            min_frequency,
            min_length,
            max_length,
            modalities,
        } => {
            let params = config
                .mining_params(min_frequency, min_length, max_length)
                .with_granularity(granularity(modalities));
            handlers::patterns::handle(&analyzer, &params)
        }

        Commands::Transitions { modalities } => {
            handlers::transitions::handle(&analyzer, granularity(modalities))
        }

        Commands::Export { format, output } => {
            handlers::export::handle(&analyzer, format, output.as_deref())
        }
    }
}

fn granularity(modalities: bool) -> Granularity {
    if modalities {
        Granularity::Modality
    } else {
        Granularity::Tool
    }
}

fn take_snapshot(store: &JsonlTraceStore) -> Result<Corpus> {
    with_snapshot_retry(|| store.snapshot())
}

/// Run `read` until it succeeds, fails with a non-retryable error, or has
/// been tried [`SNAPSHOT_ATTEMPTS`] times.
fn with_snapshot_retry<T>(mut read: impl FnMut() -> tracemine_store::Result<T>) -> Result<T> {
    let mut attempt = 1;
    loop {
        match read() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < SNAPSHOT_ATTEMPTS => {
                tracing::warn!(attempt, error = %e, "trace snapshot changed during read, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e).context("Failed to read trace snapshot"),
        }
    }
}
