use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tracemine_testing::assertions::{assert_array_len, assert_rows_normalized};
use tracemine_testing::{RecordBuilder, TraceWorld, session_records};

fn two_session_world() -> TraceWorld {
    let world = TraceWorld::new();
    world
        .write_records("live_trace.jsonl", &session_records("A", &["bash", "view", "bash"]))
        .expect("Failed to write session A");
    world
        .write_records("live_trace.jsonl", &session_records("B", &["bash", "view", "bash"]))
        .expect("Failed to write session B");
    world
}

#[test]
fn test_stats_on_empty_store() {
    let world = TraceWorld::new();
    let result = world.run(&["stats"]).expect("Failed to run stats");

    assert!(result.success(), "stderr: {}", result.stderr());
    let json = result.json().expect("stdout is not JSON");
    assert_eq!(json["total_actions"], 0);
    assert!(json["success_rate"].is_null());
}

#[test]
fn test_stats_counts_and_skipped_records() {
    let world = two_session_world();
    world
        .append_line("live_trace.jsonl", "{\"broken\": ")
        .expect("Failed to append line");

    let result = world.run(&["stats"]).expect("Failed to run stats");

    assert!(result.success(), "stderr: {}", result.stderr());
    let json = result.json().expect("stdout is not JSON");
    assert_eq!(json["total_actions"], 6);
    assert_eq!(json["session_count"], 2);
    assert_eq!(json["skipped_records"], 1);
    assert_eq!(json["by_tool"]["bash"]["count"], 4);
    assert!(result.stderr().contains("skipping malformed trace record"));
}

#[test]
fn test_session_stats() {
    let world = TraceWorld::new();
    world
        .write_records(
            "trace.jsonl",
            &[
                RecordBuilder::new("s1", 0, "view")
                    .input("path", "src/main.rs")
                    .goal("rename a flag")
                    .build(),
                RecordBuilder::new("s1", 1, "str_replace")
                    .input("path", "src/main.rs")
                    .build(),
            ],
        )
        .expect("Failed to write records");

    let result = world
        .run(&["stats", "--session", "s1"])
        .expect("Failed to run stats");

    assert!(result.success(), "stderr: {}", result.stderr());
    let json = result.json().expect("stdout is not JSON");
    assert_eq!(json["goal"], "rename a flag");
    assert_eq!(json["length"], 2);
    assert_array_len(&json, "/unique_files", 1).unwrap();
}

#[test]
fn test_unknown_session_fails() {
    let world = two_session_world();
    let mut cmd = cargo_bin_cmd!("tracemine");
    world
        .configure_command(&mut cmd)
        .args(["stats", "--session", "missing"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Session not found: missing"));
}

#[test]
fn test_patterns_two_session_scenario() {
    let world = two_session_world();
    let result = world
        .run(&["patterns", "--min-length", "2", "--max-length", "2"])
        .expect("Failed to run patterns");

    assert!(result.success(), "stderr: {}", result.stderr());
    let json = result.json().expect("stdout is not JSON");
    assert_array_len(&json, "/motifs", 2).unwrap();
    assert_eq!(json["motifs"][0]["pattern"], serde_json::json!(["bash", "view"]));
    assert_eq!(json["motifs"][1]["pattern"], serde_json::json!(["view", "bash"]));
    assert_eq!(json["motifs"][0]["occurrences"], 2);
    assert_eq!(json["params"]["min_frequency"], 2);
}

#[test]
fn test_patterns_use_config_defaults() {
    let world = two_session_world().with_config("[mining]\nmin_frequency = 3\n");
    let result = world.run(&["patterns"]).expect("Failed to run patterns");

    assert!(result.success(), "stderr: {}", result.stderr());
    let json = result.json().expect("stdout is not JSON");
    assert_eq!(json["params"]["min_frequency"], 3);
    assert_array_len(&json, "/motifs", 0).unwrap();
}

#[test]
fn test_patterns_reject_invalid_range() {
    let world = two_session_world();
    let mut cmd = cargo_bin_cmd!("tracemine");
    world
        .configure_command(&mut cmd)
        .args(["patterns", "--min-length", "4", "--max-length", "2"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid parameter"));
}

#[test]
fn test_transitions_are_normalized() {
    let world = two_session_world();
    world
        .write_records("other.jsonl", &session_records("C", &["web_fetch"]))
        .expect("Failed to write session C");

    let result = world.run(&["transitions"]).expect("Failed to run transitions");

    assert!(result.success(), "stderr: {}", result.stderr());
    let json = result.json().expect("stdout is not JSON");
    assert_rows_normalized(&json).unwrap();
    assert!(json["transitions"].get("web_fetch").is_none());
    assert_eq!(json["terminal_labels"], serde_json::json!(["web_fetch"]));

    let result = world
        .run(&["transitions", "--modalities"])
        .expect("Failed to run transitions");
    let json = result.json().expect("stdout is not JSON");
    assert_eq!(json["granularity"], "modality");
    assert_rows_normalized(&json).unwrap();
}

#[test]
fn test_export_tokens_to_file() {
    let world = two_session_world();
    let output = world.temp_dir().join("out").join("tokens.json");

    let result = world
        .run(&["export", "tokens", "--output", output.to_str().unwrap()])
        .expect("Failed to run export");

    assert!(result.success(), "stderr: {}", result.stderr());
    assert!(result.stdout().is_empty());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["tool_vocabulary"], serde_json::json!(["bash", "view"]));
    assert_eq!(json["sequences"][0]["tokens"], serde_json::json!([0, 1, 0]));
    assert_array_len(&json, "/modality_vocabulary", 7).unwrap();
}

#[test]
fn test_export_graph() {
    let world = two_session_world();
    let result = world.run(&["export", "graph"]).expect("Failed to run export");

    assert!(result.success(), "stderr: {}", result.stderr());
    let json = result.json().expect("stdout is not JSON");
    assert_array_len(&json, "/nodes", 6).unwrap();
    assert_array_len(&json, "/edges", 4).unwrap();
    assert_eq!(json["edges"][0]["weight"], 1.0);
    assert_eq!(json["nodes"][0]["category"], "touch");
    assert_eq!(json["nodes"][0]["tool_type"], "bash_tool");
}

#[test]
fn test_trace_dir_from_env() {
    let world = two_session_world();
    let mut cmd = cargo_bin_cmd!("tracemine");
    cmd.env("TRACE_DIR", world.trace_dir())
        .env_remove("TRACEMINE_TRACE_DIR")
        .arg("--config")
        .arg(world.config_path())
        .arg("stats");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"total_actions\": 6"));
}

#[test]
fn test_missing_trace_dir_fails() {
    let world = TraceWorld::new();
    let missing = world.temp_dir().join("nope");
    let mut cmd = cargo_bin_cmd!("tracemine");
    cmd.env_remove("TRACEMINE_TRACE_DIR")
        .env_remove("TRACE_DIR")
        .arg("--trace-dir")
        .arg(&missing)
        .arg("--config")
        .arg(world.config_path())
        .arg("stats");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Trace directory not found"));
}
