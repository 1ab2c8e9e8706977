pub mod export;
pub mod patterns;
pub mod stats;
pub mod transitions;

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Write `value` as pretty JSON to `output`, or to stdout when `None`.
pub(crate) fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, format!("{}\n", json))?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}
