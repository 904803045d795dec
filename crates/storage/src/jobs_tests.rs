// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use drone_core::{JobState, NewJob};
use std::fs;

fn store() -> (tempfile::TempDir, JobStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::new(&dir.path().join("prompts"));
    (dir, store)
}

fn job(dir: &Path, id: &str) -> PromptJob {
    PromptJob::create(
        NewJob {
            id: id.to_string(),
            cmd: "bash".to_string(),
            args: vec!["-lc".to_string(), "true".to_string()],
            kind: None,
            cwd: None,
            env: None,
        },
        &dir.join("prompts/out"),
        Utc::now(),
    )
}

#[test]
fn save_then_load_round_trips() {
    let (dir, store) = store();
    let job = job(dir.path(), "j1");

    store.save_job(&job).unwrap();
    assert_eq!(store.load_job("j1"), Some(job));
}

#[test]
fn load_missing_job_is_none() {
    let (_dir, store) = store();
    assert_eq!(store.load_job("nope"), None);
}

#[test]
fn load_corrupt_job_is_none() {
    let (_dir, store) = store();
    let path = store.job_path("bad");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{torn").unwrap();

    assert_eq!(store.load_job("bad"), None);
}

#[test]
fn save_preserves_state_fields() {
    let (dir, store) = store();
    let mut job = job(dir.path(), "j1");
    job.state = JobState::Failed;
    job.exit_code = Some(7);
    job.error = Some("boom".to_string());

    store.save_job(&job).unwrap();
    let back = store.load_job("j1").unwrap();
    assert_eq!(back.state, JobState::Failed);
    assert_eq!(back.exit_code, Some(7));
    assert_eq!(back.error.as_deref(), Some("boom"));
}

#[test]
fn index_defaults_empty_and_round_trips() {
    let (_dir, store) = store();
    assert!(store.load_index().order.is_empty());

    let index = JobIndex {
        order: vec!["j1".to_string(), "j2".to_string()],
    };
    store.save_index(&index).unwrap();
    assert_eq!(store.load_index(), index);
}

#[test]
fn save_index_dedups_preserving_first_occurrence() {
    let (_dir, store) = store();
    let index = JobIndex {
        order: vec![
            "j1".to_string(),
            "j2".to_string(),
            "j1".to_string(),
            "j3".to_string(),
        ],
    };

    store.save_index(&index).unwrap();
    assert_eq!(store.load_index().order, vec!["j1", "j2", "j3"]);
}

#[test]
fn save_index_keeps_newest_400() {
    let (_dir, store) = store();
    let index = JobIndex {
        order: (0..450).map(|n| format!("j{n}")).collect(),
    };

    store.save_index(&index).unwrap();
    let back = store.load_index();
    assert_eq!(back.order.len(), MAX_INDEX_ENTRIES);
    assert_eq!(back.order.first().map(String::as_str), Some("j50"));
    assert_eq!(back.order.last().map(String::as_str), Some("j449"));
}
