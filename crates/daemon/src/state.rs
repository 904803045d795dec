// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared daemon state.
//!
//! One [`AppState`] is built at startup and handed to every HTTP handler as
//! `Arc<AppState<S>>`. Generic over the session adapter so router and
//! scheduler tests run against the fake.

use crate::config::Config;
use crate::supervisor::Supervisor;
use drone_adapters::SessionAdapter;
use drone_storage::JobStore;
use std::sync::atomic::AtomicBool;

pub struct AppState<S: SessionAdapter> {
    pub config: Config,
    pub adapter: S,
    pub jobs: JobStore,
    /// Pump mutual exclusion: overlapping ticks return immediately.
    pub pump_busy: AtomicBool,
    /// Foreground-process supervisor; the mutex serializes its
    /// read-modify-write cycles on `state.json`.
    pub supervisor: tokio::sync::Mutex<Supervisor<S>>,
}

impl<S: SessionAdapter> AppState<S> {
    pub fn new(config: Config, adapter: S) -> Self {
        let jobs = JobStore::new(&config.prompts_dir());
        let supervisor = Supervisor::new(
            adapter.clone(),
            config.state_path(),
            config.logs_dir(),
        );
        Self {
            config,
            adapter,
            jobs,
            pump_busy: AtomicBool::new(false),
            supervisor: tokio::sync::Mutex::new(supervisor),
        }
    }
}
