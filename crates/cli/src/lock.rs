// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session advisory lock serializing lifecycle commands

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Lock file for `session` under the town's runtime directory.
pub fn lock_path(town_root: &Path, session: &str) -> PathBuf {
    town_root
        .join(".runtime")
        .join("locks")
        .join(format!("{}.lock", session))
}

/// Exclusive lock on a session's lock file, released on drop.
#[derive(Debug)]
pub struct SessionLock {
    file: File,
}

impl SessionLock {
    /// Take the lock, or `None` if another process holds it.
    pub fn try_acquire(town_root: &Path, session: &str) -> io::Result<Option<Self>> {
        let file = open(&lock_path(town_root, session))?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { file })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Take the lock, waiting for the current holder to finish.
    pub async fn acquire(town_root: &Path, session: &str) -> io::Result<Self> {
        if let Some(lock) = Self::try_acquire(town_root, session)? {
            return Ok(lock);
        }
        tracing::info!(session, "waiting for another gt command on this session");
        eprintln!(
            "{}",
            crate::color::muted(&format!("Waiting for another command on {}...", session))
        );
        let file = open(&lock_path(town_root, session))?;
        tokio::task::spawn_blocking(move || file.lock_exclusive().map(|()| Self { file }))
            .await
            .map_err(io::Error::other)?
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn open(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
