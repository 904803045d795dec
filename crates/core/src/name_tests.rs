// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    simple = { "main", true },
    dotted = { "drone.main", true },
    dashed = { "drone-prompt-j1", true },
    underscore = { "a_b", true },
    single_char = { "x", true },
    max_length = { &"a".repeat(64), true },
    empty = { "", false },
    too_long = { &"a".repeat(65), false },
    space = { "bad name", false },
    slash = { "a/b", false },
    colon = { "a:b", false },
    unicode = { "café", false },
)]
fn session_name_grammar(name: &str, ok: bool) {
    assert_eq!(valid_session_name(name), ok);
}

#[parameterized(
    clean = { "j1", "j1" },
    kept_chars = { "a.B_c-9", "a.B_c-9" },
    single_bad = { "a b", "a-b" },
    run_collapsed = { "a  !?b", "a-b" },
    leading_run = { "!!x", "-x" },
    all_bad = { "!!!", "-" },
    empty = { "", "job" },
)]
fn sanitize_collapses_runs(input: &str, expect: &str) {
    assert_eq!(sanitize_id(input), expect);
}

#[test]
fn sanitize_truncates_to_48() {
    let long = "x".repeat(100);
    assert_eq!(sanitize_id(&long).len(), 48);
}

#[test]
fn job_session_name_is_prefixed() {
    assert_eq!(job_session_name("j1"), "drone-prompt-j1");
    assert_eq!(job_session_name("a b"), "drone-prompt-a-b");
}

#[parameterized(
    simple = { "j1", true },
    spaces_ok = { "my job", true },
    colon_ok = { "run:42", true },
    empty = { "", false },
    slash = { "a/b", false },
    backslash = { "a\\b", false },
    dot = { ".", false },
    dotdot = { "..", false },
    too_long = { &"a".repeat(129), false },
)]
fn job_id_file_safety(id: &str, ok: bool) {
    assert_eq!(valid_job_id(id), ok);
}
