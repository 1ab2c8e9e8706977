use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::sync::LazyLock;

static PATH_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\w.-]+\.[a-z]+").unwrap());

/// Average characters per token used by the capture proxy's estimator
pub const CHARS_PER_TOKEN: f64 = 3.5;

/// Parse a record timestamp.
///
/// Accepts RFC 3339 with an offset, or a naive ISO-8601 timestamp (as written
/// by Python's `datetime.isoformat()`), which is taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Rough token estimate for a piece of text
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as f64 / CHARS_PER_TOKEN).round() as u64
}

/// Text rendering of an output payload: strings as-is, anything else as JSON
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// First 16 hex characters of the SHA-256 of `text`
pub fn short_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..16].to_string()
}

/// Collect file references from tool inputs.
///
/// Looks at the `path`, `file_path` and `filepath` keys, and pulls path-like
/// tokens out of a `command` string.
pub fn extract_file_references(inputs: &Map<String, Value>) -> BTreeSet<String> {
    let mut files = BTreeSet::new();

    for key in ["path", "file_path", "filepath"] {
        if let Some(path) = inputs.get(key).and_then(|v| v.as_str())
            && !path.is_empty()
        {
            files.insert(path.to_string());
        }
    }

    if let Some(command) = inputs.get("command").and_then(|v| v.as_str()) {
        for m in PATH_LIKE.find_iter(command) {
            files.insert(m.as_str().to_string());
        }
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2025-01-02T03:04:05Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());

        let ts = parse_timestamp("2025-01-02T05:04:05+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn test_parse_naive_isoformat() {
        let ts = parse_timestamp("2025-01-02T03:04:05.250000").unwrap();
        assert_eq!(ts.timestamp_millis() % 1000, 250);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("1234567"), 2);
    }

    #[test]
    fn test_short_digest_is_stable() {
        let a = short_digest("hello");
        assert_eq!(a.len(), 16);
        assert_eq!(a, short_digest("hello"));
        assert_ne!(a, short_digest("world"));
    }

    #[test]
    fn test_extract_file_references() {
        let inputs = json!({
            "path": "src/main.rs",
            "command": "grep -n foo lib/util.py && cat README.md",
        });
        let files = extract_file_references(inputs.as_object().unwrap());
        let files: Vec<_> = files.into_iter().collect();
        assert_eq!(files, vec!["README.md", "lib/util.py", "src/main.rs"]);
    }
}
