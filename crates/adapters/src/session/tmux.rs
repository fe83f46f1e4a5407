// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux session adapter

use super::{SessionAdapter, SessionError, SessionStyle};
use crate::subprocess::{run_with_timeout, PROCESS_TIMEOUT, TMUX_TIMEOUT};
use async_trait::async_trait;
use gt_core::SessionInfo;
use std::path::Path;
use tokio::process::Command;

/// Format string producing one `|`-separated line of session metadata
const INFO_FORMAT: &str =
    "#{session_name}|#{session_windows}|#{session_created}|#{session_attached}|#{session_activity}";

/// Guard against runaway process trees when collecting descendants.
const MAX_DESCENDANTS: usize = 256;

/// Tmux-based session adapter
#[derive(Clone, Default)]
pub struct TmuxAdapter;

impl TmuxAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionAdapter for TmuxAdapter {
    async fn has_session(&self, id: &str) -> Result<bool, SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["has-session", "-t", &exact(id)]);
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux has-session")
            .await
            .map_err(SessionError::CommandFailed)?;
        Ok(output.status.success())
    }

    async fn session_info(&self, id: &str) -> Result<SessionInfo, SessionError> {
        let line = pane_format(id, INFO_FORMAT).await?;
        parse_session_info(&line)
            .ok_or_else(|| SessionError::CommandFailed(format!("unparseable session info: {}", line)))
    }

    async fn spawn(&self, id: &str, cwd: &Path, cmd: &str) -> Result<(), SessionError> {
        // Precondition: cwd must exist
        if !cwd.exists() {
            return Err(SessionError::SpawnFailed(format!(
                "working directory does not exist: {}",
                cwd.display()
            )));
        }

        let mut tmux_cmd = Command::new("tmux");
        tmux_cmd
            .arg("new-session")
            .arg("-d")
            .arg("-s")
            .arg(id)
            .arg("-c")
            .arg(cwd)
            .arg(cmd);

        let output = run_with_timeout(tmux_cmd, TMUX_TIMEOUT, "tmux new-session")
            .await
            .map_err(SessionError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(session = id, stderr = %stderr, "tmux spawn failed");
            return Err(SessionError::SpawnFailed(stderr.trim().to_string()));
        }

        // Log stderr even on success - may contain useful warnings
        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(session = id, stderr = %stderr, "tmux spawn stderr (non-fatal)");
        }

        Ok(())
    }

    async fn set_environment(&self, id: &str, key: &str, value: &str) -> Result<(), SessionError> {
        tmux_run(
            &["set-environment", "-t", &exact(id), key, value],
            "tmux set-environment",
        )
        .await
    }

    async fn configure(&self, id: &str, style: &SessionStyle) -> Result<(), SessionError> {
        if !style.status_style.is_empty() {
            tmux_set_option(id, "status-style", &style.status_style).await;
        }
        if !style.title.is_empty() {
            tmux_set_option(id, "set-titles", "on").await;
            tmux_set_option(id, "set-titles-string", &style.title).await;
        }
        if !style.status_left.is_empty() {
            tmux_set_option(id, "status-left", &format!(" {} ", style.status_left)).await;
        }
        if !style.status_right.is_empty() {
            tmux_set_option(id, "status-right", &format!(" {} ", style.status_right)).await;
        }
        Ok(())
    }

    async fn current_command(&self, id: &str) -> Result<String, SessionError> {
        pane_format(id, "#{pane_current_command}").await
    }

    async fn is_process_running(&self, id: &str, names: &[String]) -> Result<bool, SessionError> {
        let current = self.current_command(id).await?;
        if names.iter().any(|n| n == &current) {
            return Ok(true);
        }

        let pane_pid = self.pane_pid(id).await?;
        for name in names {
            let mut cmd = Command::new("pgrep");
            cmd.args(["-P", &pane_pid.to_string(), "-x", name]);
            let output = run_with_timeout(cmd, PROCESS_TIMEOUT, "pgrep child check")
                .await
                .map_err(SessionError::CommandFailed)?;
            if output.status.success() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn pane_pid(&self, id: &str) -> Result<u32, SessionError> {
        let raw = pane_format(id, "#{pane_pid}").await?;
        raw.parse::<u32>()
            .map_err(|_| SessionError::CommandFailed(format!("invalid pane pid {:?}", raw)))
    }

    async fn get_environment(&self, id: &str, key: &str) -> Result<Option<String>, SessionError> {
        let output = tmux_output(
            &["show-environment", "-t", &exact(id)],
            "tmux show-environment",
        )
        .await?;
        Ok(parse_environment(&String::from_utf8_lossy(&output.stdout), key))
    }

    async fn capture_output(&self, id: &str, lines: u32) -> Result<String, SessionError> {
        let lines_arg = format!("-{}", lines);
        let output = tmux_output(
            &["capture-pane", "-t", id, "-p", "-S", &lines_arg],
            "tmux capture-pane",
        )
        .await?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn send(&self, id: &str, keys: &str) -> Result<(), SessionError> {
        tmux_run(&["send-keys", "-t", id, keys], "tmux send-keys").await
    }

    async fn kill(&self, id: &str) -> Result<(), SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["kill-session", "-t", &exact(id)]);
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux kill-session")
            .await
            .map_err(SessionError::CommandFailed)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SessionError::CommandFailed(format!(
                "tmux kill-session {}: {}",
                id,
                stderr.trim()
            )));
        }
        Ok(())
    }

    async fn kill_with_processes(&self, id: &str) -> Result<(), SessionError> {
        // Best-effort: the agent may ignore SIGHUP from the closing pane, so
        // terminate the tree explicitly before tearing the session down.
        match self.pane_pid(id).await {
            Ok(pid) => {
                let pids = descendants(pid).await;
                signal_all(&pids, "TERM").await;
                tokio::time::sleep(crate::env::kill_grace_ms()).await;
            }
            Err(e) => tracing::debug!(session = id, error = %e, "no pane pid, killing session only"),
        }
        // The session closes on its own if the pane process exited with its children
        if !self.has_session(id).await.unwrap_or(true) {
            return Ok(());
        }
        self.kill(id).await
    }
}

/// Exact-match target for session-scoped commands (tmux otherwise accepts
/// prefixes, so `gt-a-architect` could match `gt-a-architect2`).
fn exact(id: &str) -> String {
    format!("={}", id)
}

/// Expand `format` for the first pane of the session.
///
/// `display-message` prints an empty line for a missing target and exits 0
/// on some tmux releases; `list-panes` fails instead, so a vanished session
/// surfaces as `NotFound`.
async fn pane_format(id: &str, format: &str) -> Result<String, SessionError> {
    let target = exact(id);
    let output = tmux_output(
        &["list-panes", "-s", "-t", &target, "-F", format],
        "tmux list-panes",
    )
    .await?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .ok_or_else(|| SessionError::NotFound(id.to_string()))
}

/// Value of `key` in `show-environment` output. Lines of the form `-KEY`
/// mark variables removed from the session.
pub(crate) fn parse_environment(output: &str, key: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        (k == key).then(|| v.to_string())
    })
}

/// Parse a line produced by [`INFO_FORMAT`].
pub(crate) fn parse_session_info(line: &str) -> Option<SessionInfo> {
    let mut parts = line.split('|');
    let name = parts.next()?.to_string();
    if name.is_empty() {
        return None;
    }
    let windows = parts.next()?.parse().ok()?;
    let created = parts.next()?.parse().ok()?;
    let attached = parts.next()?.parse::<u32>().ok()? > 0;
    let activity = parts.next().and_then(|s| s.parse().ok()).unwrap_or(created);
    Some(SessionInfo {
        name,
        windows,
        created,
        attached,
        activity,
    })
}

/// Collect all descendant PIDs of `root`, children before grandchildren.
async fn descendants(root: u32) -> Vec<u32> {
    let mut found = Vec::new();
    let mut queue = vec![root];
    while let Some(parent) = queue.pop() {
        let mut cmd = Command::new("pgrep");
        cmd.args(["-P", &parent.to_string()]);
        let Ok(output) = run_with_timeout(cmd, PROCESS_TIMEOUT, "pgrep descendants").await else {
            continue;
        };
        for child in parse_pids(&String::from_utf8_lossy(&output.stdout)) {
            if found.len() >= MAX_DESCENDANTS {
                return found;
            }
            found.push(child);
            queue.push(child);
        }
    }
    found
}

pub(crate) fn parse_pids(output: &str) -> Vec<u32> {
    output
        .lines()
        .filter_map(|l| l.trim().parse::<u32>().ok())
        .collect()
}

async fn signal_all(pids: &[u32], signal: &str) {
    if pids.is_empty() {
        return;
    }
    let mut cmd = Command::new("kill");
    cmd.arg(format!("-{}", signal));
    cmd.args(pids.iter().map(|p| p.to_string()));
    if let Err(e) = run_with_timeout(cmd, PROCESS_TIMEOUT, "kill").await {
        tracing::warn!(error = %e, "failed to signal pane processes");
    }
}

/// Run a tmux command, returning `NotFound` on failure (discards output).
async fn tmux_run(args: &[&str], description: &str) -> Result<(), SessionError> {
    tmux_output(args, description).await.map(|_| ())
}

/// Run a tmux command and return the output, returning `NotFound` on failure.
async fn tmux_output(
    args: &[&str],
    description: &str,
) -> Result<std::process::Output, SessionError> {
    let mut cmd = Command::new("tmux");
    cmd.args(args);
    let output = run_with_timeout(cmd, TMUX_TIMEOUT, description)
        .await
        .map_err(SessionError::CommandFailed)?;
    if !output.status.success() {
        let session_id = args
            .windows(2)
            .find(|w| w[0] == "-t")
            .map(|w| w[1].trim_start_matches('='))
            .unwrap_or("unknown");
        return Err(SessionError::NotFound(session_id.to_string()));
    }
    Ok(output)
}

/// Set a tmux option, logging instead of failing when styling is rejected.
async fn tmux_set_option(session_id: &str, option: &str, value: &str) {
    let mut cmd = Command::new("tmux");
    cmd.args(["set-option", "-t", session_id, option, value]);
    match run_with_timeout(cmd, TMUX_TIMEOUT, "tmux set-option").await {
        Ok(output) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(session_id, option, value, stderr = %stderr, "tmux set-option failed");
        }
        Err(e) => tracing::warn!(session_id, option, value, error = %e, "tmux set-option failed"),
        _ => {}
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
