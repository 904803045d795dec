// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux session adapter

use super::{keys::normalize_key, SessionAdapter, SessionError, SessionSpec};
use crate::subprocess::{run_with_stdin, run_with_timeout, TMUX_TIMEOUT};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

/// Delay between typing text and submitting it. Some TUIs drop an Enter
/// that arrives in the same input burst as the text.
const SUBMIT_DELAY: Duration = Duration::from_millis(60);

/// Tmux-based session adapter
#[derive(Clone, Default)]
pub struct TmuxAdapter;

impl TmuxAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn tmux(args: &[&str]) -> Command {
    let mut cmd = Command::new("tmux");
    cmd.args(args);
    cmd
}

#[async_trait]
impl SessionAdapter for TmuxAdapter {
    async fn exists(&self, name: &str) -> bool {
        let present = run_with_timeout(tmux(&["has-session", "-t", name]), TMUX_TIMEOUT, "tmux has-session")
            .await
            .map(|o| o.status.success())
            .unwrap_or(false);
        if !present {
            return false;
        }

        // A session can outlive its process as a dead-pane holdover; treat
        // it as absent and reap it so the name is reusable.
        let panes = run_with_timeout(
            tmux(&["list-panes", "-t", name, "-F", "#{pane_dead}"]),
            TMUX_TIMEOUT,
            "tmux list-panes",
        )
        .await;
        let all_dead = match panes {
            Ok(output) if output.status.success() => {
                let flags = String::from_utf8_lossy(&output.stdout);
                let states: Vec<&str> = flags
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .collect();
                !states.is_empty() && states.iter().all(|l| *l == "1")
            }
            // Cannot inspect panes: assume the session is usable
            _ => false,
        };

        if all_dead {
            tracing::warn!(session = name, "dead pane holdover, killing session");
            self.kill(name).await;
            return false;
        }
        true
    }

    async fn start(&self, spec: &SessionSpec) -> Result<(), SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.arg("new-session").arg("-d").arg("-s").arg(&spec.name);
        if let Some(ref cwd) = spec.cwd {
            cmd.arg("-c").arg(cwd);
        }

        // Run through env(1) so the variables reach the command without
        // touching the tmux server environment.
        if !spec.env.is_empty() {
            cmd.arg("env");
            for (key, value) in &spec.env {
                cmd.arg(format!("{}={}", key, value));
            }
        }
        cmd.arg(&spec.cmd);
        cmd.args(&spec.args);

        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux new-session")
            .await
            .map_err(SessionError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(session = %spec.name, stderr = %stderr, "tmux spawn failed");
            return Err(SessionError::SpawnFailed(stderr.to_string()));
        }

        // Keep the pane from lingering once its process exits; styling-level
        // option, so a failure is not fatal.
        let set = run_with_timeout(
            tmux(&["set-option", "-w", "-t", &spec.name, "remain-on-exit", "off"]),
            TMUX_TIMEOUT,
            "tmux set-option",
        )
        .await;
        if let Ok(output) = set {
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::warn!(session = %spec.name, stderr = %stderr, "remain-on-exit not disabled");
            }
        }

        Ok(())
    }

    async fn kill(&self, name: &str) {
        // Session might already be dead, which is fine
        let _ = run_with_timeout(tmux(&["kill-session", "-t", name]), TMUX_TIMEOUT, "tmux kill-session")
            .await;
    }

    async fn send_text(
        &self,
        name: &str,
        text: &str,
        press_enter: bool,
    ) -> Result<(), SessionError> {
        // -l = literal mode (no key name interpretation)
        // -- = end of options (handles text starting with -)
        let output = run_with_timeout(
            tmux(&["send-keys", "-t", name, "-l", "--", text]),
            TMUX_TIMEOUT,
            "tmux send-keys",
        )
        .await
        .map_err(SessionError::CommandFailed)?;
        if !output.status.success() {
            return Err(SessionError::NotFound(name.to_string()));
        }

        if press_enter {
            // Explicit carriage return; plain Enter can be swallowed by
            // input-sensitive TUIs when it lands in the same burst.
            tokio::time::sleep(SUBMIT_DELAY).await;
            let output = run_with_timeout(
                tmux(&["send-keys", "-t", name, "-l", "--", "\r"]),
                TMUX_TIMEOUT,
                "tmux send-keys",
            )
            .await
            .map_err(SessionError::CommandFailed)?;
            if !output.status.success() {
                return Err(SessionError::NotFound(name.to_string()));
            }
        }
        Ok(())
    }

    async fn send_keys(&self, name: &str, keys: &[String]) -> Result<(), SessionError> {
        let mut cmd = tmux(&["send-keys", "-t", name]);
        for key in keys {
            cmd.arg(normalize_key(key));
        }

        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux send-keys")
            .await
            .map_err(SessionError::CommandFailed)?;
        if !output.status.success() {
            return Err(SessionError::NotFound(name.to_string()));
        }
        Ok(())
    }

    async fn paste_text(&self, name: &str, text: &str) -> Result<(), SessionError> {
        // Stage the payload in a uniquely named buffer via stdin; command
        // lines have length limits, pasted prompts do not.
        let buffer = format!("drone-buf-{}", uuid::Uuid::new_v4().simple());

        let output = run_with_stdin(
            tmux(&["load-buffer", "-b", &buffer, "-"]),
            text.as_bytes(),
            TMUX_TIMEOUT,
            "tmux load-buffer",
        )
        .await
        .map_err(SessionError::CommandFailed)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SessionError::CommandFailed(stderr.to_string()));
        }

        // -d drops the buffer after pasting; no newline is appended.
        let output = run_with_timeout(
            tmux(&["paste-buffer", "-d", "-b", &buffer, "-t", name]),
            TMUX_TIMEOUT,
            "tmux paste-buffer",
        )
        .await
        .map_err(SessionError::CommandFailed)?;
        if !output.status.success() {
            // Reap the staged buffer so a failed paste does not leak it
            let _ = run_with_timeout(
                tmux(&["delete-buffer", "-b", &buffer]),
                TMUX_TIMEOUT,
                "tmux delete-buffer",
            )
            .await;
            return Err(SessionError::NotFound(name.to_string()));
        }
        Ok(())
    }

    async fn pipe_to_file(&self, name: &str, path: &Path) -> Result<(), SessionError> {
        let sink = format!("cat >> '{}'", path.display());
        let output = run_with_timeout(
            tmux(&["pipe-pane", "-t", name, &sink]),
            TMUX_TIMEOUT,
            "tmux pipe-pane",
        )
        .await
        .map_err(SessionError::CommandFailed)?;
        if !output.status.success() {
            return Err(SessionError::NotFound(name.to_string()));
        }
        Ok(())
    }

    async fn prompt_line(&self, name: &str) -> Result<String, SessionError> {
        let capture = run_with_timeout(
            tmux(&["capture-pane", "-p", "-t", name]),
            TMUX_TIMEOUT,
            "tmux capture-pane",
        )
        .await
        .map_err(SessionError::CommandFailed)?;
        if !capture.status.success() {
            return Err(SessionError::NotFound(name.to_string()));
        }
        let pane = String::from_utf8_lossy(&capture.stdout).into_owned();
        let lines: Vec<&str> = pane.lines().collect();

        let cursor_row = run_with_timeout(
            tmux(&["display-message", "-p", "-t", name, "#{cursor_y}"]),
            TMUX_TIMEOUT,
            "tmux display-message",
        )
        .await
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8_lossy(&o.stdout).trim().parse::<usize>().ok());

        let line = match cursor_row {
            Some(row) if row < lines.len() => lines[row],
            // Cursor coordinate unavailable: fall back to the last line
            _ => lines.last().copied().unwrap_or(""),
        };
        Ok(line.to_string())
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
