// CLI integration tests for scopetrack

use std::fs;
use std::process::Command;
use tempfile::TempDir;

const OLD: &str = "\
fn keep() {
    stay();
}

fn drop_me() {
    vanish_completely_now();
}
";

const NEW: &str = "\
fn keep() {
    stay();
}
";

fn write(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("Failed to write fixture");
    path
}

#[test]
fn test_help_lists_subcommands() {
    let output = Command::new(env!("CARGO_BIN_EXE_scopetrack"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Help should exit with success");
    assert!(stdout.contains("tree"), "Help should list tree. Got: {}", stdout);
    assert!(stdout.contains("diff"), "Help should list diff. Got: {}", stdout);
}

#[test]
fn test_tree_prints_indented_outline() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "old.rs", OLD);

    let output = Command::new(env!("CARGO_BIN_EXE_scopetrack"))
        .arg("tree")
        .arg(&file)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "Got: {}", stdout);
    assert!(lines[0].starts_with("root old.rs"));
    assert!(lines[1].starts_with("  function keep"));
    assert!(lines[2].starts_with("  function drop_me"));
}

#[test]
fn test_tree_json_is_level_ordered() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "old.rs", OLD);

    let output = Command::new(env!("CARGO_BIN_EXE_scopetrack"))
        .args(["tree", "--json"])
        .arg(&file)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["old.rs", "drop_me", "keep"]);
}

#[test]
fn test_diff_reports_same_and_removed() {
    let dir = TempDir::new().unwrap();
    let old = write(&dir, "old.rs", OLD);
    let new = write(&dir, "new.rs", NEW);

    let output = Command::new(env!("CARGO_BIN_EXE_scopetrack"))
        .arg("diff")
        .arg(&old)
        .arg(&new)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("SAME     function keep"), "Got: {}", stdout);
    assert!(stdout.contains("REMOVED  function drop_me"), "Got: {}", stdout);
}

#[test]
fn test_missing_file_fails_with_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_scopetrack"))
        .args(["tree", "/nonexistent/scopetrack/input.rs"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"), "Got: {}", stderr);
}

#[test]
fn test_invalid_override_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "old.rs", OLD);
    let config = write(&dir, "bad.toml", "wordPattern = \"[unclosed\"\n");

    let output = Command::new(env!("CARGO_BIN_EXE_scopetrack"))
        .arg("--config")
        .arg(&config)
        .arg("tree")
        .arg(&file)
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid configuration"), "Got: {}", stderr);
}
