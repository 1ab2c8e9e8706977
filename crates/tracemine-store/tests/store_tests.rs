use anyhow::Result;
use tracemine_store::{Error, JsonlTraceStore};
use tracemine_testing::{RecordBuilder, TraceWorld, session_records};
use tracemine_types::TraceSource;

#[test]
fn test_snapshot_groups_sessions_across_files() -> Result<()> {
    let world = TraceWorld::new();
    let a = session_records("a", &["bash", "view", "bash"]);
    world.write_records("day1.jsonl", &a[..2])?;
    world.write_records("nested/day2.jsonl", &a[2..])?;
    world.write_records("day1.jsonl", &session_records("b", &["view"]))?;

    let corpus = JsonlTraceStore::open(world.trace_dir())?.snapshot()?;

    assert_eq!(corpus.session_count(), 2);
    assert_eq!(
        corpus.session("a").unwrap().tool_sequence(),
        vec!["bash", "view", "bash"]
    );
    assert!(corpus.skipped().is_empty());
    Ok(())
}

#[test]
fn test_malformed_lines_are_skipped_and_reported() -> Result<()> {
    let world = TraceWorld::new();
    world.write_records("trace.jsonl", &session_records("a", &["bash"]))?;
    world.append_line("trace.jsonl", "{not json")?;
    world.append_line(
        "trace.jsonl",
        r#"{"trace_id":"x","session_id":"a","sequence_num":1,"timestamp":"2025-01-01T00:00:01Z","inputs":{},"output":"","success":true}"#,
    )?;
    world.append_line("trace.jsonl", "")?;
    world.write_records(
        "trace.jsonl",
        &[RecordBuilder::new("a", 1, "view").build()],
    )?;

    let corpus = JsonlTraceStore::open(world.trace_dir())?.snapshot()?;

    assert_eq!(corpus.record_count(), 2);
    let skipped = corpus.skipped();
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0].line, Some(2));
    assert_eq!(skipped[1].line, Some(3));
    assert!(skipped[1].reason.contains("`tool`"));
    Ok(())
}

#[test]
fn test_duplicate_sequence_reported() -> Result<()> {
    let world = TraceWorld::new();
    world.write_records("trace.jsonl", &session_records("a", &["bash", "view"]))?;
    world.write_records("trace.jsonl", &[RecordBuilder::new("a", 1, "edit").build()])?;

    let corpus = JsonlTraceStore::open(world.trace_dir())?.snapshot()?;

    assert_eq!(corpus.session("a").unwrap().tool_sequence(), vec!["bash", "view"]);
    assert_eq!(corpus.skipped().len(), 1);
    Ok(())
}

#[test]
fn test_non_jsonl_files_ignored() -> Result<()> {
    let world = TraceWorld::new();
    world.write_records("trace.jsonl", &session_records("a", &["bash"]))?;
    std::fs::write(world.trace_dir().join("notes.txt"), "not a trace")?;

    let store = JsonlTraceStore::open(world.trace_dir())?;
    assert_eq!(store.trace_files()?.len(), 1);
    assert_eq!(store.snapshot()?.record_count(), 1);
    Ok(())
}

#[test]
fn test_empty_directory_yields_empty_corpus() -> Result<()> {
    let world = TraceWorld::new();
    let corpus = JsonlTraceStore::open(world.trace_dir())?.snapshot()?;
    assert!(corpus.is_empty());
    Ok(())
}

#[test]
fn test_missing_directory() {
    let world = TraceWorld::new();
    let err = JsonlTraceStore::open(world.temp_dir().join("nope")).unwrap_err();
    assert!(matches!(err, Error::TraceDirNotFound(_)));
    assert!(!err.is_retryable());
}

#[test]
fn test_repeated_snapshots_are_equal() -> Result<()> {
    let world = TraceWorld::new();
    world.write_records("trace.jsonl", &session_records("a", &["bash", "view"]))?;
    let store = JsonlTraceStore::open(world.trace_dir())?;

    assert_eq!(store.snapshot()?, store.snapshot()?);
    Ok(())
}
