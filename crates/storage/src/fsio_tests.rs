// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Sample {
    name: String,
    count: u32,
}

fn sample() -> Sample {
    Sample {
        name: "drone".to_string(),
        count: 3,
    }
}

#[test]
fn write_then_read_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.json");

    write_json_atomic(&path, &sample()).unwrap();
    let back: Sample = read_json(&path, Sample { name: String::new(), count: 0 });
    assert_eq!(back, sample());
}

#[test]
fn write_creates_missing_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a/b/c/sample.json");

    write_json_atomic(&path, &sample()).unwrap();
    assert!(path.exists());
}

#[test]
fn write_leaves_no_temp_files_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.json");

    write_json_atomic(&path, &sample()).unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["sample.json".to_string()]);
}

#[test]
fn write_is_two_space_indented() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.json");

    write_json_atomic(&path, &sample()).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"name\""));
}

#[test]
fn read_json_missing_file_returns_default() {
    let dir = tempfile::tempdir().unwrap();
    let back: Sample = read_json(&dir.path().join("nope.json"), sample());
    assert_eq!(back, sample());
}

#[test]
fn read_json_corrupt_file_returns_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{not json").unwrap();

    let back: Sample = read_json(&path, sample());
    assert_eq!(back, sample());
}

#[test]
fn read_text_small_file_is_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    fs::write(&path, "hello\n").unwrap();

    assert_eq!(read_text(&path, MAX_TEXT_BYTES), "hello\n");
}

#[test]
fn read_text_large_file_is_cut_with_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    fs::write(&path, "abcdefgh").unwrap();

    let text = read_text(&path, 4);
    assert!(text.starts_with("abcd"));
    assert!(text.ends_with("…(truncated)…"));
    assert!(!text.contains("efgh"));
}

#[test]
fn read_text_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(read_text(&dir.path().join("nope.txt"), 16), "");
}

#[test]
fn read_int_parses_trimmed_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exit.txt");
    fs::write(&path, " 7\n").unwrap();

    assert_eq!(read_int(&path), Some(7));
}

#[test]
fn read_int_absent_or_garbage_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(read_int(&dir.path().join("nope.txt")), None);

    let path = dir.path().join("bad.txt");
    fs::write(&path, "seven").unwrap();
    assert_eq!(read_int(&path), None);
}

#[test]
fn file_size_is_zero_on_error() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(file_size(&dir.path().join("nope.txt")), 0);

    let path = dir.path().join("some.txt");
    fs::write(&path, "12345").unwrap();
    assert_eq!(file_size(&path), 5);
}
