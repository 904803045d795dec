// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake session adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SessionAdapter, SessionError, SessionSpec};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded session call
#[derive(Debug, Clone)]
pub enum SessionCall {
    Exists { name: String },
    Start { name: String, cmd: String, args: Vec<String> },
    Kill { name: String },
    SendText { name: String, text: String, press_enter: bool },
    SendKeys { name: String, keys: Vec<String> },
    Paste { name: String, text: String },
    PipeToFile { name: String, path: PathBuf },
    PromptLine { name: String },
}

/// Fake session state
#[derive(Debug, Clone, Default)]
pub struct FakeSession {
    pub cmd: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub alive: bool,
    pub prompt: String,
    pub piped_to: Option<PathBuf>,
}

#[derive(Default)]
struct FakeState {
    sessions: HashMap<String, FakeSession>,
    calls: Vec<SessionCall>,
    fail_start: bool,
}

/// Fake session adapter for testing
#[derive(Clone, Default)]
pub struct FakeSessionAdapter {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SessionCall> {
        self.inner.lock().calls.clone()
    }

    /// Get a session by name
    pub fn get_session(&self, name: &str) -> Option<FakeSession> {
        self.inner.lock().sessions.get(name).cloned()
    }

    /// Names of sessions started through the adapter, in start order
    pub fn started_sessions(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                SessionCall::Start { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Add a pre-existing session (for liveness checks)
    pub fn add_session(&self, name: &str, alive: bool) {
        self.inner.lock().sessions.insert(
            name.to_string(),
            FakeSession {
                alive,
                ..FakeSession::default()
            },
        );
    }

    /// Mark a session as gone (killed out of band)
    pub fn set_dead(&self, name: &str) {
        if let Some(session) = self.inner.lock().sessions.get_mut(name) {
            session.alive = false;
        }
    }

    /// Set the prompt line reported for a session
    pub fn set_prompt(&self, name: &str, prompt: &str) {
        if let Some(session) = self.inner.lock().sessions.get_mut(name) {
            session.prompt = prompt.to_string();
        }
    }

    /// Make the next `start` calls fail
    pub fn fail_start(&self, fail: bool) {
        self.inner.lock().fail_start = fail;
    }
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn exists(&self, name: &str) -> bool {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Exists {
            name: name.to_string(),
        });
        inner.sessions.get(name).map(|s| s.alive).unwrap_or(false)
    }

    async fn start(&self, spec: &SessionSpec) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Start {
            name: spec.name.clone(),
            cmd: spec.cmd.clone(),
            args: spec.args.clone(),
        });

        if inner.fail_start {
            return Err(SessionError::SpawnFailed("fake spawn failure".to_string()));
        }

        inner.sessions.insert(
            spec.name.clone(),
            FakeSession {
                cmd: spec.cmd.clone(),
                args: spec.args.clone(),
                cwd: spec.cwd.clone(),
                env: spec.env.clone(),
                alive: true,
                prompt: String::new(),
                piped_to: None,
            },
        );
        Ok(())
    }

    async fn kill(&self, name: &str) {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Kill {
            name: name.to_string(),
        });
        inner.sessions.remove(name);
    }

    async fn send_text(
        &self,
        name: &str,
        text: &str,
        press_enter: bool,
    ) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::SendText {
            name: name.to_string(),
            text: text.to_string(),
            press_enter,
        });
        if !inner.sessions.contains_key(name) {
            return Err(SessionError::NotFound(name.to_string()));
        }
        Ok(())
    }

    async fn send_keys(&self, name: &str, keys: &[String]) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::SendKeys {
            name: name.to_string(),
            keys: keys.to_vec(),
        });
        if !inner.sessions.contains_key(name) {
            return Err(SessionError::NotFound(name.to_string()));
        }
        Ok(())
    }

    async fn paste_text(&self, name: &str, text: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Paste {
            name: name.to_string(),
            text: text.to_string(),
        });
        if !inner.sessions.contains_key(name) {
            return Err(SessionError::NotFound(name.to_string()));
        }
        Ok(())
    }

    async fn pipe_to_file(&self, name: &str, path: &Path) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::PipeToFile {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
        match inner.sessions.get_mut(name) {
            Some(session) => {
                session.piped_to = Some(path.to_path_buf());
                Ok(())
            }
            None => Err(SessionError::NotFound(name.to_string())),
        }
    }

    async fn prompt_line(&self, name: &str) -> Result<String, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::PromptLine {
            name: name.to_string(),
        });
        match inner.sessions.get(name) {
            Some(session) => Ok(session.prompt.clone()),
            None => Err(SessionError::NotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
