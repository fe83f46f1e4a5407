// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracked session PIDs, used to reap agents orphaned by a dead session.
//!
//! Files live at `<town>/.runtime/pids/<session>.pid`.

use std::path::{Path, PathBuf};

pub fn pid_file(town_root: &Path, session: &str) -> PathBuf {
    town_root
        .join(".runtime")
        .join("pids")
        .join(format!("{}.pid", session))
}

/// Record the pane PID of a session.
pub fn track_session_pid(town_root: &Path, session: &str, pid: u32) -> std::io::Result<()> {
    let path = pid_file(town_root, session);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, format!("{}\n", pid))
}

/// PID recorded for a session, if any.
#[cfg(any(test, feature = "test-support"))]
pub fn read_tracked_pid(town_root: &Path, session: &str) -> Option<u32> {
    std::fs::read_to_string(pid_file(town_root, session))
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Forget a session's PID. Missing files are not an error.
pub fn remove_tracked_pid(town_root: &Path, session: &str) -> std::io::Result<()> {
    match std::fs::remove_file(pid_file(town_root, session)) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
#[path = "pids_tests.rs"]
mod tests;
