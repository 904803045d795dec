// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use drone_core::NewJob;
use std::collections::BTreeMap;
use std::path::Path;

fn job_with(cwd: Option<&str>, env: Option<BTreeMap<String, String>>) -> PromptJob {
    PromptJob::create(
        NewJob {
            id: "j1".to_string(),
            cmd: "bash".to_string(),
            args: vec!["-lc".to_string(), "echo it's done".to_string()],
            kind: None,
            cwd: cwd.map(Into::into),
            env,
        },
        Path::new("/data/prompts/out"),
        Utc::now(),
    )
}

#[test]
fn quote_wraps_and_escapes() {
    assert_eq!(sh_quote("plain"), "'plain'");
    assert_eq!(sh_quote("it's"), r"'it'\''s'");
    assert_eq!(sh_quote(""), "''");
}

#[test]
fn env_keys_are_restricted() {
    assert_eq!(sanitize_env_key("PATH"), "PATH");
    assert_eq!(sanitize_env_key("MY-VAR.2"), "MYVAR2");
    assert_eq!(sanitize_env_key("!!"), "");
}

#[test]
fn script_never_fails_the_pane() {
    let script = compose(&job_with(None, None));
    assert!(script.starts_with("#!/bin/bash\nset +e\n"));
    assert!(script.ends_with("exit 0\n"));
}

#[test]
fn script_redirects_and_captures_exit() {
    let script = compose(&job_with(None, None));
    assert!(script.contains("> '/data/prompts/out/j1.stdout.txt' 2> '/data/prompts/out/j1.stderr.txt'"));
    assert!(script.contains("rc=$?"));
    assert!(script.contains("printf '%s' \"$rc\" > '/data/prompts/out/j1.exit.txt'"));
}

#[test]
fn script_quotes_command_and_args() {
    let script = compose(&job_with(None, None));
    assert!(script.contains(r"'bash' '-lc' 'echo it'\''s done'"));
}

#[test]
fn cwd_is_conditional() {
    assert!(!compose(&job_with(None, None)).contains("cd "));
    assert!(compose(&job_with(Some("/work dir"), None)).contains("cd '/work dir'"));
}

#[test]
fn env_entries_become_sanitized_exports() {
    let mut env = BTreeMap::new();
    env.insert("GOOD_KEY".to_string(), "v1".to_string());
    env.insert("odd-key".to_string(), "v2".to_string());
    env.insert("???".to_string(), "dropped".to_string());

    let script = compose(&job_with(None, Some(env)));
    assert!(script.contains("export GOOD_KEY='v1'"));
    assert!(script.contains("export oddkey='v2'"));
    assert!(!script.contains("dropped"));
}
