use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn examdup(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_examdup"))
        .arg("--home")
        .arg(home)
        .arg("--verbose")
        .args(args)
        .env("RUST_LOG", "examdup=debug")
        .env("NO_COLOR", "1")
        .output()
        .expect("run examdup")
}

#[test]
fn init_with_debug_logging_keeps_logs_off_stdout() {
    let home = tempdir().expect("tempdir");
    let output = examdup(home.path(), &["init"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stdout.contains("Opening database"), "stdout: {}", stdout);
    assert!(stderr.contains("Opening database"), "stderr: {}", stderr);
}

#[test]
fn compare_json_stdout_carries_no_log_lines() {
    let home = tempdir().expect("tempdir");
    assert!(examdup(home.path(), &["init"]).status.success());

    let scan = home.path().join("q.png");
    std::fs::write(&scan, b"not really a png").expect("write scan");

    let output = examdup(
        home.path(),
        &["compare", scan.to_str().expect("scan path"), "--json"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!stdout.contains("Opening database"), "stdout: {}", stdout);
    assert!(!stdout.contains("DEBUG"), "stdout: {}", stdout);
    assert!(!stdout.contains("INFO"), "stdout: {}", stdout);

    // The scan is unreadable, so either OCR fails and only stderr is
    // written, or whatever reaches stdout must parse as one JSON document.
    if !stdout.trim().is_empty() {
        serde_json::from_str::<serde_json::Value>(&stdout).expect("stdout is pure JSON");
    }
}
