// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::session::{FakeSessionAdapter, SessionCall};
use serial_test::{parallel, serial};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

/// Assert that captured logs contain the expected substring
fn assert_log(logs: &str, label: &str, expected: &str) {
    assert!(logs.contains(expected), "Should log {label}. Logs:\n{logs}",);
}

/// Spawn a traced session, returning the fake adapter and traced wrapper
async fn spawn_traced_session(id: &str) -> (FakeSessionAdapter, TracedSession<FakeSessionAdapter>) {
    let fake = FakeSessionAdapter::default();
    let traced = TracedSession::new(fake.clone());
    traced.spawn(id, Path::new("/tmp"), "claude").await.unwrap();
    (fake, traced)
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
#[serial(tracing)]
fn traced_session_spawn_logs_entry_and_completion() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedSession::new(FakeSessionAdapter::default());
        traced
            .spawn("gt-alpha-architect", Path::new("/tmp"), "claude")
            .await
    });

    assert!(result.is_ok(), "spawn should succeed: {:?}", result);
    assert_log(&logs, "span name", "session.spawn");
    assert_log(&logs, "session name", "gt-alpha-architect");
    assert_log(&logs, "entry message", "starting");
    assert_log(&logs, "completion", "session created");
    assert_log(&logs, "timing", "elapsed_ms");
}

#[test]
#[serial(tracing)]
fn traced_session_spawn_logs_error_on_failure() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeSessionAdapter::default();
        fake.fail_spawn("no server");
        let traced = TracedSession::new(fake);
        traced.spawn("s", Path::new("/tmp"), "claude").await
    });

    assert!(result.is_err());
    assert_log(&logs, "spawn failure", "spawn failed");
}

#[test]
#[serial(tracing)]
fn traced_session_send_logs_operation() {
    let (logs, _) = with_tracing(|| async {
        let (_, traced) = spawn_traced_session("s").await;
        traced.send("s", "Enter").await
    });

    assert_log(&logs, "send span", "session.send");
    assert_log(&logs, "send entry", "sending");
}

#[test]
#[serial(tracing)]
fn traced_session_send_logs_error_on_failure() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedSession::new(FakeSessionAdapter::default());
        traced.send("nonexistent", "hello").await
    });

    assert!(result.is_err());
    assert_log(&logs, "send failure", "send failed");
}

#[test]
#[serial(tracing)]
fn traced_session_kill_logs_operation() {
    let (logs, _) = with_tracing(|| async {
        let (_, traced) = spawn_traced_session("s").await;
        traced.kill("s").await
    });

    assert_log(&logs, "kill span", "session.kill");
    assert_log(&logs, "kill completion", "killed");
}

#[test]
#[serial(tracing)]
fn traced_session_kill_logs_warning_on_failure() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedSession::new(FakeSessionAdapter::default());
        traced.kill("nonexistent").await
    });

    assert!(result.is_err());
    assert_log(&logs, "kill failure", "kill failed");
}

#[test]
#[serial(tracing)]
fn traced_session_set_environment_failure_logs_key() {
    let (logs, result) = with_tracing(|| async {
        let (fake, traced) = spawn_traced_session("s").await;
        fake.fail_set_environment("GT_ROLE");
        traced.set_environment("s", "GT_ROLE", "architect").await
    });

    assert!(result.is_err());
    assert_log(&logs, "failure", "set_environment failed");
    assert_log(&logs, "key", "GT_ROLE");
}

#[test]
#[serial(tracing)]
fn traced_session_wait_for_command_logs_outcome() {
    let (logs, result) = with_tracing(|| async {
        let (_, traced) = spawn_traced_session("s").await;
        traced
            .wait_for_command("s", &["bash".to_string()], Duration::from_millis(50))
            .await
    });

    assert!(result.is_ok());
    assert_log(&logs, "success", "agent command running");
}

// =============================================================================
// Delegation tests - verify traced wrapper delegates to inner adapter
// =============================================================================

#[tokio::test]
#[parallel(tracing)]
async fn traced_session_delegates_spawn_to_inner() {
    let fake = FakeSessionAdapter::default();
    let traced = TracedSession::new(fake.clone());

    traced
        .spawn("gt-alpha-architect", Path::new("/tmp"), "claude --flag")
        .await
        .unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        SessionCall::Spawn { id, cwd, cmd } => {
            assert_eq!(id, "gt-alpha-architect");
            assert_eq!(cwd, &PathBuf::from("/tmp"));
            assert_eq!(cmd, "claude --flag");
        }
        other => panic!("Expected Spawn call, got {:?}", other),
    }

    assert!(fake.get_session("gt-alpha-architect").is_some());
}

#[tokio::test]
#[parallel(tracing)]
async fn traced_session_has_session_delegates_to_inner() {
    let (fake, traced) = spawn_traced_session("s").await;

    assert!(traced.has_session("s").await.unwrap());
    fake.kill("s").await.unwrap();
    assert!(!traced.has_session("s").await.unwrap());
}

#[tokio::test]
#[parallel(tracing)]
async fn traced_session_is_process_running_delegates_to_inner() {
    let (fake, traced) = spawn_traced_session("s").await;
    let names = vec!["claude".to_string()];

    assert!(traced.is_process_running("s", &names).await.unwrap());
    fake.set_agent_exited("s");
    assert!(!traced.is_process_running("s", &names).await.unwrap());
}

#[tokio::test]
#[parallel(tracing)]
async fn traced_session_capture_output_delegates_to_inner() {
    let (fake, traced) = spawn_traced_session("s").await;
    fake.set_output("s", vec!["line1".to_string(), "line2".to_string()]);

    let output = traced.capture_output("s", 10).await.unwrap();
    assert!(output.contains("line1"));
    assert!(output.contains("line2"));
}

#[tokio::test]
#[parallel(tracing)]
async fn traced_session_configure_and_env_delegate_to_inner() {
    let (fake, traced) = spawn_traced_session("s").await;
    let style = SessionStyle {
        status_style: "bg=#000000,fg=#ffffff".to_string(),
        ..SessionStyle::default()
    };

    traced.configure("s", &style).await.unwrap();
    traced.set_environment("s", "GT_RIG", "alpha").await.unwrap();
    assert_eq!(
        traced.get_environment("s", "GT_RIG").await.unwrap(),
        Some("alpha".to_string())
    );

    let session = fake.get_session("s").unwrap();
    assert_eq!(session.style, Some(style));
    assert_eq!(session.env, vec![("GT_RIG".to_string(), "alpha".to_string())]);
}

#[tokio::test]
#[parallel(tracing)]
async fn traced_session_kill_with_processes_delegates_to_inner() {
    let (fake, traced) = spawn_traced_session("s").await;
    traced.kill_with_processes("s").await.unwrap();
    assert!(fake.get_session("s").is_none());
    assert!(fake
        .calls()
        .iter()
        .any(|c| matches!(c, SessionCall::KillWithProcesses { .. })));
}
