// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keeps agent runtime files out of a rig's git history.

use std::io::Write;
use std::path::Path;

/// Patterns every rig work dir must ignore.
pub const REQUIRED_PATTERNS: &[&str] = &[".runtime/", ".claude/", ".beads/", ".logs/"];

const HEADER: &str = "# Gas Town agent runtime files";

/// Append any missing [`REQUIRED_PATTERNS`] to `<work_dir>/.gitignore`.
///
/// Creates the file if needed. Returns whether the file was changed.
pub fn ensure_gitignore_patterns(work_dir: &Path) -> std::io::Result<bool> {
    let path = work_dir.join(".gitignore");
    let existing = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    let present: Vec<&str> = existing.lines().map(str::trim).collect();
    let missing: Vec<&str> = REQUIRED_PATTERNS
        .iter()
        .copied()
        .filter(|p| !present.contains(p) && !present.contains(&p.trim_end_matches('/')))
        .collect();
    if missing.is_empty() {
        return Ok(false);
    }

    let mut addition = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        addition.push('\n');
    }
    if !existing.is_empty() {
        addition.push('\n');
    }
    if !present.contains(&HEADER) {
        addition.push_str(HEADER);
        addition.push('\n');
    }
    for pattern in &missing {
        addition.push_str(pattern);
        addition.push('\n');
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    file.write_all(addition.as_bytes())?;
    tracing::debug!(path = %path.display(), added = ?missing, "updated .gitignore");
    Ok(true)
}

#[cfg(test)]
#[path = "gitignore_tests.rs"]
mod tests;
