// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drone daemon (droned)
//!
//! In-container HTTP service that owns tmux-backed terminal sessions,
//! schedules a single-concurrency queue of prompt jobs with crash-safe
//! on-disk records, and serves incremental reads of session and job output.
//!
//! Architecture:
//! - HTTP handlers mutate the job store and process record
//! - The pump reacts to on-disk state plus wakeups and drives tmux
//! - State persists under one data directory; exactly one daemon owns it

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod finalize;
mod http;
mod scheduler;
mod script;
mod state;
mod supervisor;

use clap::Parser;
use config::{Args, Config};
use drone_adapters::TmuxAdapter;
use state::AppState;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        error!("{e}");
        eprintln!("droned: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::resolve(args)?;
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, TmuxAdapter::new()));

    // Recovery pump before any request is served: running jobs whose
    // session died while we were down get finalized, queued jobs resume.
    scheduler::pump(state.as_ref()).await;

    spawn_pump_ticker(Arc::clone(&state));

    let router = http::build_router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, name = %state.config.name, "drone daemon listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("drone daemon stopped");
    Ok(())
}

/// Periodic pump tick; enqueue wakeups cover the latency-sensitive path.
fn spawn_pump_ticker(state: Arc<AppState<TmuxAdapter>>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(scheduler::PUMP_INTERVAL);
        loop {
            interval.tick().await;
            scheduler::pump(state.as_ref()).await;
        }
    });
}

async fn shutdown_signal() {
    let wait_for = |kind: SignalKind, name: &'static str| async move {
        match signal(kind) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("failed to install {name} handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = wait_for(SignalKind::terminate(), "SIGTERM") => info!("received SIGTERM, shutting down"),
        _ = wait_for(SignalKind::interrupt(), "SIGINT") => info!("received SIGINT, shutting down"),
    }
}
