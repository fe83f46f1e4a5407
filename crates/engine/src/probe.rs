// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session health probe

use gt_adapters::{SessionAdapter, SessionError};
use gt_core::SessionLiveness;

/// Session variable naming the processes of the agent the session was
/// launched with, comma separated.
pub const AGENT_PROCESSES_ENV: &str = "GT_AGENT_PROCESSES";

/// Classify a session as absent, zombie or healthy.
///
/// Queries the session table, then looks for the session's agent process.
/// The names recorded in the session under [`AGENT_PROCESSES_ENV`] win over
/// `fallback_names`, so an agent started with `--agent` is recognized.
/// Read-only. A session that disappears between queries is reported as absent.
pub async fn probe<S: SessionAdapter>(
    sessions: &S,
    id: &str,
    fallback_names: &[String],
) -> Result<SessionLiveness, SessionError> {
    if !sessions.has_session(id).await? {
        return Ok(SessionLiveness::Absent);
    }
    let recorded = match sessions.get_environment(id, AGENT_PROCESSES_ENV).await {
        Ok(value) => value.map(|v| split_process_names(&v)).filter(|n| !n.is_empty()),
        Err(SessionError::NotFound(_)) => return Ok(SessionLiveness::Absent),
        Err(e) => {
            tracing::debug!(id, error = %e, "agent process names not readable");
            None
        }
    };
    let names = recorded.as_deref().unwrap_or(fallback_names);
    match sessions.is_process_running(id, names).await {
        Ok(true) => Ok(SessionLiveness::Healthy),
        Ok(false) => Ok(SessionLiveness::Zombie),
        Err(SessionError::NotFound(_)) => Ok(SessionLiveness::Absent),
        Err(e) => Err(e),
    }
}

/// Value stored under [`AGENT_PROCESSES_ENV`] for `names`.
pub fn join_process_names(names: &[String]) -> String {
    names.join(",")
}

fn split_process_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
