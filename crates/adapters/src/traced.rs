// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::session::{SessionAdapter, SessionError, SessionStyle};
use async_trait::async_trait;
use gt_core::SessionInfo;
use std::path::Path;
use std::time::Duration;
use tracing::Instrument;

/// Wrapper that adds tracing to any SessionAdapter
#[derive(Clone)]
pub struct TracedSession<S> {
    inner: S,
}

impl<S> TracedSession<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: SessionAdapter> SessionAdapter for TracedSession<S> {
    async fn has_session(&self, id: &str) -> Result<bool, SessionError> {
        let result = self.inner.has_session(id).await;
        tracing::trace!(id, exists = ?result.as_ref().ok(), "checked");
        result
    }

    async fn session_info(&self, id: &str) -> Result<SessionInfo, SessionError> {
        self.inner.session_info(id).await
    }

    async fn spawn(&self, id: &str, cwd: &Path, cmd: &str) -> Result<(), SessionError> {
        async {
            tracing::info!(cmd_len = cmd.len(), "starting");
            let start = std::time::Instant::now();
            let result = self.inner.spawn(id, cwd, cmd).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "session created"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "spawn failed"),
            }
            result
        }
        .instrument(tracing::info_span!("session.spawn", id, cwd = %cwd.display()))
        .await
    }

    async fn set_environment(&self, id: &str, key: &str, value: &str) -> Result<(), SessionError> {
        let result = self.inner.set_environment(id, key, value).await;
        match &result {
            Ok(()) => tracing::debug!(id, key, "environment set"),
            Err(e) => tracing::warn!(id, key, error = %e, "set_environment failed"),
        }
        result
    }

    async fn get_environment(&self, id: &str, key: &str) -> Result<Option<String>, SessionError> {
        self.inner.get_environment(id, key).await
    }

    async fn configure(&self, id: &str, style: &SessionStyle) -> Result<(), SessionError> {
        let result = self.inner.configure(id, style).await;
        if let Err(ref e) = result {
            tracing::warn!(id, error = %e, "configure failed");
        }
        result
    }

    async fn current_command(&self, id: &str) -> Result<String, SessionError> {
        self.inner.current_command(id).await
    }

    async fn is_process_running(&self, id: &str, names: &[String]) -> Result<bool, SessionError> {
        let result = self.inner.is_process_running(id, names).await;
        tracing::trace!(id, running = ?result.as_ref().ok(), "process check");
        result
    }

    async fn pane_pid(&self, id: &str) -> Result<u32, SessionError> {
        self.inner.pane_pid(id).await
    }

    async fn capture_output(&self, id: &str, lines: u32) -> Result<String, SessionError> {
        let result = self.inner.capture_output(id, lines).await;
        tracing::info_span!("session.capture", id, lines).in_scope(|| {
            tracing::debug!(
                captured_len = result.as_ref().map(|s| s.len()).ok(),
                "captured"
            )
        });
        result
    }

    async fn send(&self, id: &str, keys: &str) -> Result<(), SessionError> {
        tracing::info_span!("session.send", id)
            .in_scope(|| tracing::debug!(keys_len = keys.len(), "sending"));
        let result = self.inner.send(id, keys).await;
        if let Err(ref e) = result {
            tracing::error!(error = %e, "send failed");
        }
        result
    }

    async fn kill(&self, id: &str) -> Result<(), SessionError> {
        let result = self.inner.kill(id).await;
        tracing::info_span!("session.kill", id).in_scope(|| match &result {
            Ok(()) => tracing::info!("killed"),
            Err(e) => tracing::warn!(error = %e, "kill failed (may be expected)"),
        });
        result
    }

    async fn kill_with_processes(&self, id: &str) -> Result<(), SessionError> {
        let result = self.inner.kill_with_processes(id).await;
        tracing::info_span!("session.kill_tree", id).in_scope(|| match &result {
            Ok(()) => tracing::info!("killed with processes"),
            Err(e) => tracing::warn!(error = %e, "kill_with_processes failed"),
        });
        result
    }

    async fn wait_for_command(
        &self,
        id: &str,
        shells: &[String],
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let start = std::time::Instant::now();
        let result = self.inner.wait_for_command(id, shells, timeout).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => tracing::info!(id, elapsed_ms, "agent command running"),
            Err(e) => tracing::warn!(id, elapsed_ms, error = %e, "agent command did not start"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
