use std::fs;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::tempdir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_odata-filter")
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env_remove("ODATA_FILTER_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("command should run")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_compile_prints_predicate_json() {
    let output = run(&["compile", "(name eq 'Bob' or name eq 'Fred') and stars ne 2"]);
    assert_eq!(
        stdout_json(&output),
        json!({"$and": [
            {"$or": [{"name": {"$eq": "Bob"}}, {"name": {"$eq": "Fred"}}]},
            {"stars": {"$ne": 2}}
        ]})
    );
}

#[test]
fn test_compact_output_is_single_line() {
    let output = run(&["--compact", "compile", "in(pages,10,15)"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end().lines().count(), 1, "stdout: {}", stdout);
    assert_eq!(stdout_json(&output), json!({"pages": {"$in": [10, 15]}}));
}

#[test]
fn test_invalid_filter_exits_with_error() {
    let output = run(&[
        "--color",
        "never",
        "compile",
        "name eq 'Bob' or stars gt 2 and stars lt 1",
    ]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error:"), "stderr: {}", stderr);
    assert!(
        stderr.contains("Cannot mix 'and' and 'or'"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_tokens_prints_table() {
    let output = run(&["tokens", "startswith(title,'A')"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("open-paren"), "stdout: {}", stdout);
    assert!(stdout.contains("symbol"), "stdout: {}", stdout);
    assert!(stdout.contains("startswith"), "stdout: {}", stdout);
}

#[test]
fn test_ast_prints_tree() {
    let output = run(&["ast", "a eq 1 or contains(b,'x')"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Or"), "stdout: {}", stdout);
    assert!(stdout.contains("Contains"), "stdout: {}", stdout);
}

#[test]
fn test_query_uses_config_resource_defaults() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("books.toml");
    fs::write(
        &config,
        "[resource]\ntop = 5\nselect = \"-secret\"\n",
    )
    .expect("write config");

    let output = run(&[
        "--config",
        config.to_str().expect("utf8 path"),
        "query",
        "--filter",
        "genre eq 'Action'",
        "--select",
        "secret",
    ]);

    assert_eq!(
        stdout_json(&output),
        json!({
            "filter": {"genre": {"$eq": "Action"}},
            "sort": "_id",
            "limit": 5,
            "projection": "-secret"
        })
    );
}

#[test]
fn test_missing_config_file_is_reported() {
    let dir = tempdir().expect("temp dir");
    let missing = dir.path().join("nope.toml");

    let output = run(&[
        "--color",
        "never",
        "--config",
        missing.to_str().expect("utf8 path"),
        "compile",
        "a eq 1",
    ]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "stderr: {}", stderr);
    assert!(stderr.contains("nope.toml"), "stderr: {}", stderr);
}
