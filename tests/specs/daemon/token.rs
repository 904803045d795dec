//! Token resolution specs
//!
//! The daemon must refuse to start without a non-empty bearer token.

use crate::prelude::*;

#[test]
fn missing_token_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    droned()
        .args(["--port", "39999", "--data-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("no token"));
}

#[test]
fn whitespace_only_token_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("token"), "  \n").unwrap();

    droned()
        .args(["--port", "39999", "--data-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("no token"));
}
