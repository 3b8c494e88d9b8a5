//! Exit status of the binary on fatal startup errors.

use std::fs;
use std::process::Command;

fn explain_eval() -> Command {
    Command::new(env!("CARGO_BIN_EXE_explain-eval"))
}

#[test]
fn test_missing_corpus_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("judge.key");
    fs::write(&key, "sk-judge").unwrap();

    let output = explain_eval()
        .arg(&key)
        .arg(dir.path().join("no-such-corpus"))
        .args(["http://127.0.0.1:1", "http://127.0.0.1:1/v1", "judge-model"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no-such-corpus"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_empty_key_file_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("judge.key");
    fs::write(&key, "  \n").unwrap();

    let output = explain_eval()
        .arg(&key)
        .arg(dir.path())
        .args(["http://127.0.0.1:1", "http://127.0.0.1:1/v1", "judge-model"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn test_missing_arguments_is_usage_error() {
    let output = explain_eval().arg("judge.key").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_empty_corpus_prints_zero_report() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("judge.key");
    fs::write(&key, "sk-judge").unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();

    let output = explain_eval()
        .arg(&key)
        .arg(&corpus)
        .args(["http://127.0.0.1:1", "http://127.0.0.1:1/v1", "judge-model"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("| Median Similarity Score | 0.0/10 |"), "stdout: {stdout}");
    assert!(stdout.contains("| Median Latency | 0.00s |"));
}
