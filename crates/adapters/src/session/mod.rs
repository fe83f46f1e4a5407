// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session management adapters

mod tmux;

pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSession, FakeSessionAdapter, SessionCall};

use async_trait::async_trait;
use gt_core::SessionInfo;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },
}

/// Visual styling applied to a session's status bar and terminal title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStyle {
    /// tmux `status-style` value, e.g. `bg=#1e3a5f,fg=#e0e0e0`
    pub status_style: String,
    pub title: String,
    pub status_left: String,
    pub status_right: String,
}

/// Adapter for managing terminal multiplexer sessions (tmux, etc.)
///
/// Sessions are addressed by name. The adapter keeps no state of its own:
/// every call is a fresh query against the multiplexer.
#[async_trait]
pub trait SessionAdapter: Clone + Send + Sync + 'static {
    /// Check whether a session with this name is in the session table
    async fn has_session(&self, id: &str) -> Result<bool, SessionError>;

    /// Fetch session metadata
    async fn session_info(&self, id: &str) -> Result<SessionInfo, SessionError>;

    /// Create a detached session named `id` running `cmd` in `cwd`.
    ///
    /// Fails if a session with that name already exists.
    async fn spawn(&self, id: &str, cwd: &Path, cmd: &str) -> Result<(), SessionError>;

    /// Set an environment variable in the session's environment
    async fn set_environment(&self, id: &str, key: &str, value: &str) -> Result<(), SessionError>;

    /// Read a variable from the session's environment; `None` when unset
    async fn get_environment(&self, id: &str, key: &str) -> Result<Option<String>, SessionError>;

    /// Apply status-bar styling to an existing session
    async fn configure(&self, _id: &str, _style: &SessionStyle) -> Result<(), SessionError> {
        Ok(())
    }

    /// Name of the command currently in the foreground of the session's pane
    async fn current_command(&self, id: &str) -> Result<String, SessionError>;

    /// Check if a process with one of `names` runs in the session's pane
    /// (as the pane command itself or as a child of the pane process)
    async fn is_process_running(&self, id: &str, names: &[String]) -> Result<bool, SessionError>;

    /// PID of the session pane's top-level process
    async fn pane_pid(&self, id: &str) -> Result<u32, SessionError>;

    /// Capture recent output from a session
    async fn capture_output(&self, id: &str, lines: u32) -> Result<String, SessionError>;

    /// Send keys to a session (key names like `Enter` are interpreted)
    async fn send(&self, id: &str, keys: &str) -> Result<(), SessionError>;

    /// Kill a session
    async fn kill(&self, id: &str) -> Result<(), SessionError>;

    /// Terminate the processes running in a session's pane, then kill the session
    async fn kill_with_processes(&self, id: &str) -> Result<(), SessionError>;

    /// Wait until the pane's foreground command is no longer one of `shells`,
    /// i.e. the launched program has replaced the wrapper shell.
    ///
    /// Returns `SessionError::Timeout` if that does not happen within `timeout`
    /// and `SessionError::NotFound` if the session disappears while waiting.
    async fn wait_for_command(
        &self,
        id: &str,
        shells: &[String],
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let interval = crate::env::command_poll_ms();
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match self.current_command(id).await {
                Ok(cmd) if !cmd.is_empty() && !shells.iter().any(|s| s == &cmd) => return Ok(()),
                Ok(_) => {}
                Err(SessionError::NotFound(name)) => return Err(SessionError::NotFound(name)),
                Err(e) => tracing::debug!(id, error = %e, "pane command not readable yet"),
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Err(SessionError::Timeout {
                    what: format!("agent command in {}", id),
                    timeout,
                });
            }
            tokio::time::sleep(interval.min(deadline - now)).await;
        }
    }
}
