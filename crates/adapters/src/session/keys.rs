// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-name normalization for `send-keys`.
//!
//! Clients speak in common aliases (`ctrl+c`, `esc`, `shift+tab`); tmux
//! wants its own names (`C-c`, `Escape`, `BTab`). The alias set is closed
//! and small; unknown names pass through verbatim so native tmux key names
//! keep working. Changing the output for an existing alias is a
//! compatibility break.

/// Map a client key alias to the tmux key name, case-insensitively.
pub fn normalize_key(key: &str) -> String {
    let lower = key.to_ascii_lowercase();

    if let Some(rest) = lower.strip_prefix("ctrl+") {
        if rest.len() == 1 {
            return format!("C-{rest}");
        }
    }

    match lower.as_str() {
        "esc" | "escape" => "Escape".to_string(),
        "enter" | "return" => "Enter".to_string(),
        "tab" => "Tab".to_string(),
        "shift+tab" | "backtab" => "BTab".to_string(),
        "space" => "Space".to_string(),
        "up" => "Up".to_string(),
        "down" => "Down".to_string(),
        "left" => "Left".to_string(),
        "right" => "Right".to_string(),
        _ => key.to_string(),
    }
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
