// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: flags, token, directory bootstrap.

use clap::Parser;
use drone_storage::ensure_dir;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Default data directory inside the container.
const DEFAULT_DATA_DIR: &str = "/dvm-data/drone";

/// drone daemon (droned)
///
/// In-container HTTP service driving terminal workloads under tmux.
#[derive(Debug, Parser)]
#[command(name = "droned", version)]
pub struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long)]
    pub port: u16,

    /// Root of the daemon-owned state directory
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Bearer token, verbatim (takes precedence over --token-file)
    #[arg(long)]
    pub token: Option<String>,

    /// File holding the bearer token (default: <data-dir>/token)
    #[arg(long)]
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no token: provide --token or a non-empty token file at {0}")]
    MissingToken(PathBuf),
    #[error("failed to prepare data directory: {0}")]
    Bootstrap(#[from] drone_storage::StoreError),
}

/// Resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub token: String,
    /// Reported by `/v1/health`; the container hostname when available.
    pub name: String,
    /// Lazily probed root of terminal-session pane logs.
    log_root: Arc<OnceLock<PathBuf>>,
}

impl Config {
    pub fn new(host: String, port: u16, data_dir: PathBuf, token: String) -> Self {
        Self {
            host,
            port,
            data_dir,
            token,
            name: hostname(),
            log_root: Arc::new(OnceLock::new()),
        }
    }

    /// Resolve flags into a ready configuration.
    ///
    /// Loads the token (flag wins over the trimmed token file) and creates
    /// the data directories. Fatal problems surface as errors; the caller
    /// exits non-zero.
    pub fn resolve(args: Args) -> Result<Self, ConfigError> {
        let token_file = args
            .token_file
            .unwrap_or_else(|| args.data_dir.join("token"));

        let token = match args.token {
            Some(token) if !token.is_empty() => token,
            _ => {
                let from_file = std::fs::read_to_string(&token_file)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default();
                if from_file.is_empty() {
                    return Err(ConfigError::MissingToken(token_file));
                }
                from_file
            }
        };

        let config = Self::new(args.host, args.port, args.data_dir, token);
        config.bootstrap()?;
        Ok(config)
    }

    /// Create the directories the daemon writes into.
    pub fn bootstrap(&self) -> Result<(), ConfigError> {
        ensure_dir(&self.logs_dir())?;
        ensure_dir(&self.prompts_dir().join("jobs"))?;
        ensure_dir(&self.out_dir())?;
        Ok(())
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.data_dir.join("prompts")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.data_dir.join("prompts").join("out")
    }

    /// Root holding per-session pane logs for terminal endpoints.
    ///
    /// Host tooling installs the `pipe-pane` redirections; the daemon only
    /// reads. Probed once per process lifetime: first existing of the
    /// daemon's own `logs/`, the stock container path, `/tmp/drone-logs`.
    pub fn session_log_root(&self) -> &Path {
        self.log_root.get_or_init(|| {
            let candidates = [
                self.logs_dir(),
                PathBuf::from("/dvm-data/drone/logs"),
                PathBuf::from("/tmp/drone-logs"),
            ];
            candidates
                .iter()
                .find(|c| c.is_dir())
                .cloned()
                .unwrap_or_else(|| self.logs_dir())
        })
    }

    /// Pane-log path for a named terminal session.
    pub fn session_log_path(&self, session: &str) -> PathBuf {
        self.session_log_root().join(format!("{session}.log"))
    }
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
        })
        .unwrap_or_else(|| "drone".to_string())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
