// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal-multiplexer session adapters

mod keys;
mod tmux;

pub use keys::normalize_key;
pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSessionAdapter, SessionCall};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// Definition of a new detached session.
#[derive(Debug, Clone)]
pub struct SessionSpec {
    pub name: String,
    pub cmd: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

/// Adapter for driving named terminal-multiplexer sessions.
///
/// Every operation is best-effort with respect to multiplexer failures;
/// implementations must never panic the process. Only [`start`] is required
/// to surface failure, because callers depend on the session actually
/// existing afterwards.
///
/// [`start`]: SessionAdapter::start
#[async_trait]
pub trait SessionAdapter: Clone + Send + Sync + 'static {
    /// Whether a session with this name is present and usable.
    ///
    /// A session whose panes have all died (a "dead pane holdover") is
    /// reported absent and cleaned up best-effort.
    async fn exists(&self, name: &str) -> bool;

    /// Create a detached session running the spec's command.
    async fn start(&self, spec: &SessionSpec) -> Result<(), SessionError>;

    /// Kill a session. Best-effort; a missing session is not an error.
    async fn kill(&self, name: &str);

    /// Type literal text into the pane, optionally submitting it.
    async fn send_text(&self, name: &str, text: &str, press_enter: bool)
        -> Result<(), SessionError>;

    /// Send a sequence of named keys (aliases normalized per [`normalize_key`]).
    async fn send_keys(&self, name: &str, keys: &[String]) -> Result<(), SessionError>;

    /// Paste a large buffer into the pane without appending a newline.
    async fn paste_text(&self, name: &str, text: &str) -> Result<(), SessionError>;

    /// Redirect pane output to append to `path`.
    async fn pipe_to_file(&self, name: &str, path: &Path) -> Result<(), SessionError>;

    /// The single line at the current cursor row.
    async fn prompt_line(&self, name: &str) -> Result<String, SessionError>;
}
