//! Behavioral specifications for the droned daemon.
//!
//! These tests are black-box: they invoke the daemon binary and verify
//! stdout, stderr, and exit codes. Startup-failure paths only; anything
//! needing a live listener or tmux is covered by in-crate tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// daemon/
#[path = "specs/daemon/flags.rs"]
mod daemon_flags;
#[path = "specs/daemon/token.rs"]
mod daemon_token;
