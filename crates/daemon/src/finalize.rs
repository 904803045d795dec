// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Post-exit settling and job finalization.
//!
//! A job is finalized once its tmux session is gone, but "gone" does not
//! mean "flushed": some child processes keep appending output after the
//! pane dies, and the exit file may land a beat after the last write.
//! The settle loop waits, bounded, for the capture files to stop moving.

use chrono::Utc;
use drone_core::{JobState, PromptJob};
use drone_storage::{file_size, read_int, read_text, MAX_TEXT_BYTES};
use std::time::{Duration, Instant};

/// Upper bound on the settle loop.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Cadence of re-reads inside the settle loop.
const SETTLE_TICK: Duration = Duration::from_millis(150);

/// Consecutive unchanged size readings required to call output stable.
const STABLE_READS: u32 = 2;

const THREAD_STARTED: &str = r#""type":"thread.started""#;
const TURN_STARTED: &str = r#""type":"turn.started""#;
const TERMINAL_MARKERS: [&str; 4] = [
    r#""type":"turn.completed""#,
    r#""type":"response.completed""#,
    r#""type":"response.failed""#,
    r#""type":"error""#,
];

fn has_terminal_marker(stdout: &str) -> bool {
    TERMINAL_MARKERS.iter().any(|m| stdout.contains(m))
}

/// Whether a structured-event CLI is mid-flush: the stream has started a
/// turn but no terminal event has landed yet.
///
/// String-pattern policy, not parsing; additional kinds slot in here
/// without touching the scheduler.
fn structured_flush_pending(kind: Option<&str>, stdout: &str) -> bool {
    kind == Some("codex")
        && stdout.contains(THREAD_STARTED)
        && stdout.contains(TURN_STARTED)
        && !has_terminal_marker(stdout)
}

/// Finalize a job whose session is no longer alive.
///
/// Reads the capture files (settling first when needed), classifies the
/// outcome by exit code, and fills in the terminal fields. The caller
/// persists the record.
pub async fn finalize(job: &mut PromptJob) {
    let mut exit_code = read_exit(job);
    let mut stdout = read_text(&job.stdout_path, MAX_TEXT_BYTES);
    let mut stderr = read_text(&job.stderr_path, MAX_TEXT_BYTES);

    let needs_settling =
        exit_code.is_none() || structured_flush_pending(job.kind.as_deref(), &stdout);

    if needs_settling {
        let deadline = Instant::now() + SETTLE_TIMEOUT;
        let mut stable_reads = 0u32;
        let mut sizes = (file_size(&job.stdout_path), file_size(&job.stderr_path));

        while Instant::now() < deadline {
            tokio::time::sleep(SETTLE_TICK).await;

            exit_code = read_exit(job);
            stdout = read_text(&job.stdout_path, MAX_TEXT_BYTES);
            stderr = read_text(&job.stderr_path, MAX_TEXT_BYTES);

            let current = (file_size(&job.stdout_path), file_size(&job.stderr_path));
            if current == sizes {
                stable_reads += 1;
            } else {
                stable_reads = 0;
                sizes = current;
            }

            let structured = job.kind.as_deref() == Some("codex")
                && stdout.contains(THREAD_STARTED)
                && stdout.contains(TURN_STARTED);
            if structured {
                if has_terminal_marker(&stdout)
                    && (exit_code.is_some() || stable_reads >= STABLE_READS)
                {
                    break;
                }
            } else if exit_code.is_some() && stable_reads >= STABLE_READS {
                break;
            }
        }
    }

    let now = Utc::now();
    job.state = if exit_code == Some(0) {
        JobState::Done
    } else {
        JobState::Failed
    };
    job.finished_at = Some(now);
    job.updated_at = now;
    job.exit_code = exit_code;
    job.stdout = Some(stdout);
    job.stderr = Some(stderr);

    if job.state == JobState::Failed {
        let from_stderr = job.stderr.as_deref().map(str::trim).unwrap_or("");
        let from_stdout = job.stdout.as_deref().map(str::trim).unwrap_or("");
        let message = if !from_stderr.is_empty() {
            from_stderr.to_string()
        } else if !from_stdout.is_empty() {
            from_stdout.to_string()
        } else if let Some(prior) = job.error.take() {
            prior
        } else {
            "failed".to_string()
        };
        job.error = Some(message);
    }
}

fn read_exit(job: &PromptJob) -> Option<i32> {
    read_int(&job.exit_path).map(|v| v as i32)
}

#[cfg(test)]
#[path = "finalize_tests.rs"]
mod tests;
