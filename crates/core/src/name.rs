// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-name grammar and job-session naming.
//!
//! Externally supplied session names are validated against a conservative
//! identifier grammar before any tmux operation. Prompt jobs get their
//! session names derived deterministically from the job ID.

/// Maximum length of an externally supplied session name.
pub const SESSION_NAME_MAX: usize = 64;

/// Prefix for sessions owned by prompt jobs.
pub const JOB_SESSION_PREFIX: &str = "drone-prompt-";

/// Maximum length of the sanitized job-ID portion of a session name.
const SANITIZED_ID_MAX: usize = 48;

/// Maximum byte length of a caller-chosen job ID.
pub const JOB_ID_MAX: usize = 128;

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Whether `name` is a valid externally supplied session name: non-empty,
/// at most [`SESSION_NAME_MAX`] characters, drawn from `[A-Za-z0-9._-]`.
pub fn valid_session_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= SESSION_NAME_MAX && name.chars().all(is_name_char)
}

/// Whether `id` is a usable job ID: non-empty, at most [`JOB_ID_MAX`] bytes,
/// free of path separators, and not a dot-directory name.
///
/// Job IDs become file stems under the job and output directories, so this
/// check is what keeps the derived capture paths inside those directories.
pub fn valid_job_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= JOB_ID_MAX
        && !id.contains(['/', '\\'])
        && id != "."
        && id != ".."
}

/// Collapse every run of characters outside `[A-Za-z0-9._-]` to a single
/// `-`, truncate to 48 characters, and substitute `job` when the input was
/// empty.
pub fn sanitize_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len().min(SANITIZED_ID_MAX));
    let mut in_run = false;
    for c in id.chars() {
        if out.len() >= SANITIZED_ID_MAX {
            break;
        }
        if is_name_char(c) {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    if out.is_empty() {
        out.push_str("job");
    }
    out
}

/// Deterministic tmux session name for a prompt job.
pub fn job_session_name(id: &str) -> String {
    format!("{}{}", JOB_SESSION_PREFIX, sanitize_id(id))
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
