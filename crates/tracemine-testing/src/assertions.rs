//! Custom assertions over CLI JSON output.

use anyhow::{Context, Result};
use serde_json::Value;

/// Assert that the array at `pointer` has `expected` elements.
pub fn assert_array_len(json: &Value, pointer: &str, expected: usize) -> Result<()> {
    let items = json
        .pointer(pointer)
        .and_then(Value::as_array)
        .with_context(|| format!("Expected array at '{}'", pointer))?;

    if items.len() != expected {
        anyhow::bail!(
            "Expected {} items at '{}', got {}",
            expected,
            pointer,
            items.len()
        );
    }

    Ok(())
}

/// Assert that every row of a transition model sums to one.
pub fn assert_rows_normalized(json: &Value) -> Result<()> {
    let rows = json["transitions"]
        .as_object()
        .context("Expected 'transitions' object in JSON")?;

    for (label, row) in rows {
        let next = row["next"]
            .as_object()
            .with_context(|| format!("Row '{}' missing 'next'", label))?;
        let total: f64 = next
            .values()
            .filter_map(|t| t["probability"].as_f64())
            .sum();

        if (total - 1.0).abs() > 1e-9 {
            anyhow::bail!("Row '{}' sums to {} instead of 1", label, total);
        }
    }

    Ok(())
}
