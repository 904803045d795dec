//! Flag parsing specs
//!
//! Verify fatal-error behavior for missing and malformed flags.

use crate::prelude::*;

#[test]
fn missing_port_is_fatal() {
    droned()
        .assert()
        .failure()
        .stderr(predicates::str::contains("--port"));
}

#[test]
fn non_numeric_port_is_fatal() {
    droned()
        .args(["--port", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid value"));
}

#[test]
fn help_lists_flags() {
    droned()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("--data-dir"))
        .stdout(predicates::str::contains("--token-file"));
}

#[test]
fn version_prints_and_exits() {
    droned()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("droned"));
}
