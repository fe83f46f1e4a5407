// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake session adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SessionAdapter, SessionError, SessionStyle};
use async_trait::async_trait;
use gt_core::SessionInfo;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded session call
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
    HasSession { id: String },
    SessionInfo { id: String },
    Spawn { id: String, cwd: PathBuf, cmd: String },
    SetEnvironment { id: String, key: String, value: String },
    GetEnvironment { id: String, key: String },
    Configure { id: String, style: SessionStyle },
    CurrentCommand { id: String },
    IsProcessRunning { id: String, names: Vec<String> },
    PanePid { id: String },
    CaptureOutput { id: String, lines: u32 },
    Send { id: String, keys: String },
    Kill { id: String },
    KillWithProcesses { id: String },
}

/// Fake session state
#[derive(Debug, Clone)]
pub struct FakeSession {
    pub name: String,
    pub cwd: PathBuf,
    pub cmd: String,
    pub env: Vec<(String, String)>,
    pub style: Option<SessionStyle>,
    pub output: Vec<String>,
    /// Foreground command of the pane
    pub current_command: String,
    /// Whether the hosted agent process is running
    pub process_running: bool,
    pub pid: u32,
    pub created: u64,
}

/// Scripted failures for a fake adapter
#[derive(Default)]
struct Failures {
    has_session: Option<String>,
    spawn: Option<String>,
    kill: Option<String>,
    configure: Option<String>,
    pane_pid: Option<String>,
    env_keys: HashSet<String>,
}

struct FakeSessionState {
    sessions: HashMap<String, FakeSession>,
    calls: Vec<SessionCall>,
    failures: Failures,
    /// Whether newly spawned sessions get a running agent
    agent_starts: bool,
    /// Pane output given to newly spawned sessions
    initial_output: Vec<String>,
    next_pid: u32,
    clock: u64,
}

/// Fake session adapter for testing
#[derive(Clone)]
pub struct FakeSessionAdapter {
    inner: Arc<Mutex<FakeSessionState>>,
}

impl Default for FakeSessionAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeSessionState {
                sessions: HashMap::new(),
                calls: Vec::new(),
                failures: Failures::default(),
                agent_starts: true,
                initial_output: Vec::new(),
                next_pid: 1000,
                clock: 1_700_000_000,
            })),
        }
    }
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SessionCall> {
        self.inner.lock().calls.clone()
    }

    /// Get a session by name
    pub fn get_session(&self, id: &str) -> Option<FakeSession> {
        self.inner.lock().sessions.get(id).cloned()
    }

    /// Names of all sessions currently in the table
    pub fn session_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.inner.lock().sessions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Set session output
    pub fn set_output(&self, id: &str, output: Vec<String>) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            session.output = output;
        }
    }

    /// Simulate the hosted agent exiting while the session shell survives
    pub fn set_agent_exited(&self, id: &str) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            session.process_running = false;
            session.current_command = "bash".to_string();
        }
    }

    /// Control whether newly spawned sessions get a running agent
    pub fn set_agent_starts(&self, starts: bool) {
        self.inner.lock().agent_starts = starts;
    }

    /// Pane output for sessions spawned from now on
    pub fn set_initial_output(&self, output: Vec<String>) {
        self.inner.lock().initial_output = output;
    }

    /// Add a pre-existing session (for testing liveness checks).
    ///
    /// A running agent shows up as `claude` in the pane.
    pub fn add_session(&self, id: &str, agent_running: bool) {
        self.add_session_running(id, "claude", agent_running);
    }

    /// Add a pre-existing session whose pane runs `cmd`
    pub fn add_session_running(&self, id: &str, cmd: &str, agent_running: bool) {
        let mut inner = self.inner.lock();
        let session = new_session(&mut inner, id, Path::new("/"), cmd, agent_running);
        inner.sessions.insert(id.to_string(), session);
    }

    pub fn fail_has_session(&self, message: &str) {
        self.inner.lock().failures.has_session = Some(message.to_string());
    }

    pub fn fail_spawn(&self, message: &str) {
        self.inner.lock().failures.spawn = Some(message.to_string());
    }

    pub fn fail_kill(&self, message: &str) {
        self.inner.lock().failures.kill = Some(message.to_string());
    }

    pub fn fail_configure(&self, message: &str) {
        self.inner.lock().failures.configure = Some(message.to_string());
    }

    pub fn fail_pane_pid(&self, message: &str) {
        self.inner.lock().failures.pane_pid = Some(message.to_string());
    }

    /// Make `set_environment` fail for one key
    pub fn fail_set_environment(&self, key: &str) {
        self.inner.lock().failures.env_keys.insert(key.to_string());
    }
}

fn new_session(
    state: &mut FakeSessionState,
    id: &str,
    cwd: &Path,
    cmd: &str,
    agent_running: bool,
) -> FakeSession {
    state.next_pid += 1;
    state.clock += 1;
    let program = cmd
        .split_whitespace()
        .next()
        .and_then(|first| first.rsplit('/').next())
        .unwrap_or("agent");
    FakeSession {
        name: id.to_string(),
        cwd: cwd.to_path_buf(),
        cmd: cmd.to_string(),
        env: Vec::new(),
        style: None,
        output: state.initial_output.clone(),
        current_command: if agent_running {
            program.to_string()
        } else {
            "bash".to_string()
        },
        process_running: agent_running,
        pid: state.next_pid,
        created: state.clock,
    }
}

fn not_found(id: &str) -> SessionError {
    SessionError::NotFound(id.to_string())
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn has_session(&self, id: &str) -> Result<bool, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::HasSession { id: id.to_string() });
        if let Some(ref msg) = inner.failures.has_session {
            return Err(SessionError::CommandFailed(msg.clone()));
        }
        Ok(inner.sessions.contains_key(id))
    }

    async fn session_info(&self, id: &str) -> Result<SessionInfo, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::SessionInfo { id: id.to_string() });
        let session = inner.sessions.get(id).ok_or_else(|| not_found(id))?;
        Ok(SessionInfo {
            name: session.name.clone(),
            windows: 1,
            created: session.created,
            attached: false,
            activity: session.created,
        })
    }

    async fn spawn(&self, id: &str, cwd: &Path, cmd: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Spawn {
            id: id.to_string(),
            cwd: cwd.to_path_buf(),
            cmd: cmd.to_string(),
        });
        if let Some(ref msg) = inner.failures.spawn {
            return Err(SessionError::SpawnFailed(msg.clone()));
        }
        if inner.sessions.contains_key(id) {
            return Err(SessionError::SpawnFailed(format!("duplicate session: {}", id)));
        }
        let agent_starts = inner.agent_starts;
        let session = new_session(&mut inner, id, cwd, cmd, agent_starts);
        inner.sessions.insert(id.to_string(), session);
        Ok(())
    }

    async fn set_environment(&self, id: &str, key: &str, value: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::SetEnvironment {
            id: id.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        });
        if inner.failures.env_keys.contains(key) {
            return Err(SessionError::CommandFailed(format!("set-environment {}", key)));
        }
        let session = inner.sessions.get_mut(id).ok_or_else(|| not_found(id))?;
        session.env.retain(|(k, _)| k != key);
        session.env.push((key.to_string(), value.to_string()));
        Ok(())
    }

    async fn get_environment(&self, id: &str, key: &str) -> Result<Option<String>, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::GetEnvironment {
            id: id.to_string(),
            key: key.to_string(),
        });
        let session = inner.sessions.get(id).ok_or_else(|| not_found(id))?;
        Ok(session
            .env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    async fn configure(&self, id: &str, style: &SessionStyle) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Configure {
            id: id.to_string(),
            style: style.clone(),
        });
        if let Some(ref msg) = inner.failures.configure {
            return Err(SessionError::CommandFailed(msg.clone()));
        }
        let session = inner.sessions.get_mut(id).ok_or_else(|| not_found(id))?;
        session.style = Some(style.clone());
        Ok(())
    }

    async fn current_command(&self, id: &str) -> Result<String, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::CurrentCommand { id: id.to_string() });
        inner
            .sessions
            .get(id)
            .map(|s| s.current_command.clone())
            .ok_or_else(|| not_found(id))
    }

    async fn is_process_running(&self, id: &str, names: &[String]) -> Result<bool, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::IsProcessRunning {
            id: id.to_string(),
            names: names.to_vec(),
        });
        inner
            .sessions
            .get(id)
            .map(|s| s.process_running && names.contains(&s.current_command))
            .ok_or_else(|| not_found(id))
    }

    async fn pane_pid(&self, id: &str) -> Result<u32, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::PanePid { id: id.to_string() });
        if let Some(ref msg) = inner.failures.pane_pid {
            return Err(SessionError::CommandFailed(msg.clone()));
        }
        inner
            .sessions
            .get(id)
            .map(|s| s.pid)
            .ok_or_else(|| not_found(id))
    }

    async fn capture_output(&self, id: &str, lines: u32) -> Result<String, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::CaptureOutput {
            id: id.to_string(),
            lines,
        });
        let session = inner.sessions.get(id).ok_or_else(|| not_found(id))?;
        let start = session.output.len().saturating_sub(lines as usize);
        Ok(session.output[start..].join("\n"))
    }

    async fn send(&self, id: &str, keys: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Send {
            id: id.to_string(),
            keys: keys.to_string(),
        });
        if !inner.sessions.contains_key(id) {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn kill(&self, id: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Kill { id: id.to_string() });
        if let Some(ref msg) = inner.failures.kill {
            return Err(SessionError::CommandFailed(msg.clone()));
        }
        inner
            .sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SessionError::CommandFailed(format!("can't find session: {}", id)))
    }

    async fn kill_with_processes(&self, id: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(SessionCall::KillWithProcesses { id: id.to_string() });
        if let Some(ref msg) = inner.failures.kill {
            return Err(SessionError::CommandFailed(msg.clone()));
        }
        inner
            .sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SessionError::CommandFailed(format!("can't find session: {}", id)))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
