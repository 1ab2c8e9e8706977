//! TraceWorld pattern for declarative integration test setup.

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracemine_types::ActionRecord;

/// Isolated environment holding a trace directory and a config location.
///
/// # Example
/// ```no_run
/// use tracemine_testing::{TraceWorld, session_records};
///
/// let world = TraceWorld::new();
/// world.write_records("live_trace.jsonl", &session_records("a", &["bash", "view"])).unwrap();
///
/// let result = world.run(&["stats"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TraceWorld {
    temp_dir: TempDir,
    trace_dir: PathBuf,
    config_path: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TraceWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let trace_dir = temp_dir.path().join("traces");
        let config_path = temp_dir.path().join("config.toml");

        fs::create_dir_all(&trace_dir).expect("Failed to create trace dir");

        Self {
            temp_dir,
            trace_dir,
            config_path,
            env_vars: HashMap::new(),
        }
    }

    pub fn trace_dir(&self) -> &Path {
        &self.trace_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write a TOML config file used by [`TraceWorld::run`].
    pub fn with_config(self, toml: &str) -> Self {
        fs::write(&self.config_path, toml).expect("Failed to write config");
        self
    }

    /// Append records as JSON lines to `file_name` inside the trace dir.
    pub fn write_records(&self, file_name: &str, records: &[ActionRecord]) -> Result<()> {
        let mut file = self.open_append(file_name)?;
        for record in records {
            writeln!(file, "{}", serde_json::to_string(record)?)?;
        }
        Ok(())
    }

    /// Append a raw line verbatim (a newline is added).
    pub fn append_line(&self, file_name: &str, line: &str) -> Result<()> {
        let mut file = self.open_append(file_name)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn open_append(&self, file_name: &str) -> Result<fs::File> {
        let path = self.trace_dir.join(file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(OpenOptions::new().create(true).append(true).open(path)?)
    }

    /// Point a CLI command at this world's trace dir and config.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--trace-dir")
            .arg(&self.trace_dir)
            .arg("--config")
            .arg(&self.config_path)
            .env_remove("TRACEMINE_TRACE_DIR")
            .env_remove("TRACE_DIR")
            .env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run the `tracemine` binary against this world.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("tracemine")
            .map_err(|e| anyhow::anyhow!("Failed to find tracemine binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
