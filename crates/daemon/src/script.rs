// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launcher-script composition for prompt jobs.
//!
//! A job runs inside its tmux session as a small bash script written next
//! to the capture files. The script always exits 0 so the pane does not
//! flash an error status; the real exit code lands in the exit file.

use drone_core::PromptJob;
use std::fmt::Write as _;

/// Single-quote `value` for bash.
pub fn sh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Restrict an environment key to `[A-Za-z0-9_]`.
pub fn sanitize_env_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Compose the launcher script for `job`.
pub fn compose(job: &PromptJob) -> String {
    let mut script = String::new();
    script.push_str("#!/bin/bash\n");
    script.push_str("set +e\n");

    if let Some(ref cwd) = job.cwd {
        let _ = writeln!(script, "cd {}", sh_quote(&cwd.display().to_string()));
    }

    if let Some(ref env) = job.env {
        for (key, value) in env {
            let key = sanitize_env_key(key);
            if key.is_empty() {
                continue;
            }
            let _ = writeln!(script, "export {}={}", key, sh_quote(value));
        }
    }

    let mut command = sh_quote(&job.cmd);
    for arg in &job.args {
        command.push(' ');
        command.push_str(&sh_quote(arg));
    }
    let _ = writeln!(
        script,
        "{} > {} 2> {}",
        command,
        sh_quote(&job.stdout_path.display().to_string()),
        sh_quote(&job.stderr_path.display().to_string()),
    );

    script.push_str("rc=$?\n");
    let _ = writeln!(
        script,
        "printf '%s' \"$rc\" > {}",
        sh_quote(&job.exit_path.display().to_string()),
    );
    script.push_str("exit 0\n");
    script
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
