use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tracemine")]
#[command(about = "Mine recorded agent action traces", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory scanned recursively for *.jsonl trace files
    #[arg(long, global = true, env = "TRACEMINE_TRACE_DIR")]
    pub trace_dir: Option<String>,

    /// Config file (defaults to <data dir>/tracemine/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Corpus-wide or per-session statistics")]
    Stats {
        /// Report a single session instead of the whole corpus
        #[arg(long)]
        session: Option<String>,
    },

    #[command(about = "Recurring action subsequences")]
    Patterns {
        #[arg(long)]
        min_frequency: Option<usize>,

        #[arg(long)]
        min_length: Option<usize>,

        #[arg(long)]
        max_length: Option<usize>,

        /// Mine classified modalities instead of tool names
        #[arg(long)]
        modalities: bool,
    },

    #[command(about = "First-order transition probabilities")]
    Transitions {
        /// Model transitions between modalities instead of tool names
        #[arg(long)]
        modalities: bool,
    },

    #[command(about = "Export the corpus for sequence or graph learning")]
    Export {
        #[arg(value_enum)]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Vocabulary plus token sequences per session
    Tokens,
    /// Temporal graph of actions and in-session edges
    Graph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}
