//! Integration tests that drive the treeprint binary end to end

use super::test_utils::write_file;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary from `cwd` with an isolated configuration environment
fn treeprint(cwd: &Path, args: &[&str]) -> Output {
    let isolated = cwd.join(".isolated");
    fs::create_dir_all(&isolated).unwrap();
    Command::new(env!("CARGO_BIN_EXE_treeprint"))
        .current_dir(cwd)
        .env("HOME", &isolated)
        .env("XDG_CONFIG_HOME", &isolated)
        .env_remove("TREEPRINT_LOG")
        .env_remove("TREEPRINT_LOG_OUTPUT")
        .args(args)
        .arg("--no-color")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_write_then_read_unchanged() {
    let cwd = TempDir::new().unwrap();
    let tree = TempDir::new().unwrap();
    write_file(tree.path(), "a.txt", "alpha");
    write_file(tree.path(), "d/b.txt", "beta");
    let root = tree.path().to_str().unwrap();

    let write = treeprint(cwd.path(), &[root, "w"]);
    assert!(write.status.success(), "stderr={}", stderr(&write));
    assert!(stdout(&write).contains("Successfully wrote"));
    assert!(cwd.path().join("checksums.json").exists());

    let read = treeprint(cwd.path(), &[root, "r"]);
    assert!(read.status.success(), "stderr={}", stderr(&read));
    assert_eq!(stdout(&read), "No differences found");
}

#[test]
fn test_differences_exit_zero_with_json_report() {
    let cwd = TempDir::new().unwrap();
    let tree = TempDir::new().unwrap();
    write_file(tree.path(), "a/x.txt", "payload");
    write_file(tree.path(), "b/keep.txt", "keep");
    let root = tree.path().to_str().unwrap();

    assert!(treeprint(cwd.path(), &[root, "w"]).status.success());
    fs::rename(tree.path().join("a/x.txt"), tree.path().join("b/x.txt")).unwrap();

    let read = treeprint(cwd.path(), &[root, "r", "--format", "json"]);
    assert!(read.status.success(), "stderr={}", stderr(&read));

    let value: serde_json::Value = serde_json::from_str(&stdout(&read)).unwrap();
    assert_eq!(value["result"], "differences");
    assert_eq!(value["changes"].as_array().unwrap().len(), 1);
    assert_eq!(value["changes"][0]["status"], "Moved");
}

#[test]
fn test_custom_baseline_path() {
    let cwd = TempDir::new().unwrap();
    let tree = TempDir::new().unwrap();
    write_file(tree.path(), "a.txt", "alpha");
    let root = tree.path().to_str().unwrap();

    let write = treeprint(cwd.path(), &[root, "w", "--baseline", "state/base.json"]);
    assert!(write.status.success(), "stderr={}", stderr(&write));
    assert!(cwd.path().join("state/base.json").exists());
    assert!(!cwd.path().join("checksums.json").exists());
}

#[test]
fn test_invalid_mode_fails() {
    let cwd = TempDir::new().unwrap();
    let tree = TempDir::new().unwrap();
    write_file(tree.path(), "a.txt", "alpha");

    let output = treeprint(cwd.path(), &[tree.path().to_str().unwrap(), "x"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid mode 'x'"));
    assert!(!cwd.path().join("checksums.json").exists());
}

#[test]
fn test_empty_directory_fails() {
    let cwd = TempDir::new().unwrap();
    let tree = TempDir::new().unwrap();

    let output = treeprint(cwd.path(), &[tree.path().to_str().unwrap(), "w"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No files found"));
    assert!(!cwd.path().join("checksums.json").exists());
}

#[test]
fn test_missing_root_fails() {
    let cwd = TempDir::new().unwrap();
    let missing = cwd.path().join("does-not-exist");

    let output = treeprint(cwd.path(), &[missing.to_str().unwrap(), "r"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Filesystem error"));
}

#[test]
fn test_missing_arguments_fail() {
    let cwd = TempDir::new().unwrap();
    let output = treeprint(cwd.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_succeeds() {
    let cwd = TempDir::new().unwrap();
    let output = treeprint(cwd.path(), &["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("treeprint"));
}

#[test]
fn test_quiet_suppresses_progress() {
    let cwd = TempDir::new().unwrap();
    let tree = TempDir::new().unwrap();
    write_file(tree.path(), "a.txt", "alpha");

    let output = treeprint(cwd.path(), &[tree.path().to_str().unwrap(), "w", "--quiet"]);
    assert!(output.status.success());
    assert!(!stderr(&output).contains("Scanning directory"));
}

#[test]
fn test_log_file_receives_records() {
    let cwd = TempDir::new().unwrap();
    let tree = TempDir::new().unwrap();
    write_file(tree.path(), "a.txt", "alpha");
    let log = cwd.path().join("run.log");

    let output = treeprint(
        cwd.path(),
        &[
            tree.path().to_str().unwrap(),
            "w",
            "--log-level",
            "info",
            "--log-file",
            log.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "stderr={}", stderr(&output));
    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("Treeprint starting"));
}
