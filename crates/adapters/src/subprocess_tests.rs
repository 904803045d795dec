// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn run_with_timeout_captures_output() {
    let mut cmd = Command::new("echo");
    cmd.arg("hello");

    let output = run_with_timeout(cmd, Duration::from_secs(5), "echo")
        .await
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
}

#[tokio::test]
async fn run_with_timeout_reports_elapsed() {
    let mut cmd = Command::new("sleep");
    cmd.arg("5");

    let err = run_with_timeout(cmd, Duration::from_millis(50), "sleep")
        .await
        .unwrap_err();
    assert!(err.contains("timed out"));
}

#[tokio::test]
async fn run_with_timeout_reports_missing_binary() {
    let cmd = Command::new("definitely-not-a-binary-xyz");

    let err = run_with_timeout(cmd, Duration::from_secs(1), "missing")
        .await
        .unwrap_err();
    assert!(err.contains("failed"));
}

#[tokio::test]
async fn run_with_stdin_feeds_input() {
    let cmd = Command::new("cat");

    let output = run_with_stdin(cmd, b"piped bytes", Duration::from_secs(5), "cat")
        .await
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "piped bytes");
}
