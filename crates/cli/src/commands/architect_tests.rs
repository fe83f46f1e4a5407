// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gt_adapters::{FakeComposer, FakeIdentityRegistrar, FakeSessionAdapter};
use std::time::Duration;
use tempfile::TempDir;

const SESSION: &str = "gt-alpha-architect";

type FakeManager = ArchitectManager<FakeSessionAdapter, FakeIdentityRegistrar, FakeComposer>;

struct Setup {
    _dir: TempDir,
    sessions: FakeSessionAdapter,
    composer: FakeComposer,
    manager: FakeManager,
}

fn setup() -> Setup {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("mayor")).unwrap();
    std::fs::write(dir.path().join("mayor/town.toml"), "").unwrap();
    std::fs::create_dir_all(dir.path().join("alpha")).unwrap();

    let sessions = FakeSessionAdapter::new();
    let composer = FakeComposer::new();
    let config = LifecycleConfig {
        startup_timeout: Duration::from_millis(50),
        settle_delay: Duration::ZERO,
        prompt_poll_attempts: 1,
        prompt_poll_interval: Duration::from_millis(1),
        ..LifecycleConfig::default()
    };
    let manager = ArchitectManager::new(
        Rig::new("alpha", dir.path().join("alpha")),
        sessions.clone(),
        FakeIdentityRegistrar::new(),
        composer.clone(),
        config,
    );
    Setup {
        _dir: dir,
        sessions,
        composer,
        manager,
    }
}

fn text(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

fn launch(env: &[&str]) -> LaunchArgs {
    LaunchArgs {
        agent: None,
        env: env.iter().map(|s| s.to_string()).collect(),
    }
}

#[tokio::test]
async fn start_reports_started_session() {
    let s = setup();
    let mut out = Vec::new();

    start(&s.manager, &launch(&["FOO=bar"]), &mut out).await.unwrap();

    let out = text(out);
    assert!(out.contains("Starting architect for alpha..."), "{out}");
    assert!(out.contains("Architect started for alpha"), "{out}");
    assert!(out.contains("Use 'gt architect attach' to connect"));
    assert!(!out.contains("warnings"));
    assert!(s.sessions.get_session(SESSION).is_some());
}

#[tokio::test]
async fn start_when_running_is_a_notice() {
    let s = setup();
    s.manager.start(None, &[]).await.unwrap();
    let mut out = Vec::new();

    start(&s.manager, &LaunchArgs::default(), &mut out).await.unwrap();

    let out = text(out);
    assert!(out.contains("Architect is already running"), "{out}");
    assert!(!out.contains("Architect started"));
}

#[tokio::test]
async fn start_failure_is_an_error_with_context() {
    let s = setup();
    s.composer.fail_resolve();
    let mut out = Vec::new();

    let err = start(&s.manager, &LaunchArgs::default(), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "starting architect");
    assert!(err.downcast_ref::<LifecycleError>().is_some());
}

#[tokio::test]
async fn start_lists_warning_steps() {
    let s = setup();
    s.sessions.fail_configure("bad style");
    let mut out = Vec::new();

    start(&s.manager, &LaunchArgs::default(), &mut out).await.unwrap();

    assert!(text(out).contains("Started with warnings: theme"));
}

#[tokio::test]
async fn stop_when_absent_is_a_notice() {
    let s = setup();
    let mut out = Vec::new();
    stop(&s.manager, &mut out).await.unwrap();
    assert!(text(out).contains("Architect is not running"));
}

#[tokio::test]
async fn stop_reports_stopped_session() {
    let s = setup();
    s.manager.start(None, &[]).await.unwrap();
    let mut out = Vec::new();

    stop(&s.manager, &mut out).await.unwrap();

    assert!(text(out).contains("Architect stopped for alpha"));
    assert!(s.sessions.session_names().is_empty());
}

#[tokio::test]
async fn stop_driver_failure_is_an_error() {
    let s = setup();
    s.sessions.add_session(SESSION, true);
    s.sessions.fail_kill("boom");
    let mut out = Vec::new();

    let err = stop(&s.manager, &mut out).await.unwrap_err();
    assert_eq!(err.to_string(), "stopping architect");
}

#[tokio::test]
async fn status_json_when_stopped_omits_session() {
    let s = setup();
    let mut out = Vec::new();

    status(&s.manager, true, &mut out).await.unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "running": false, "rig_name": "alpha" })
    );
}

#[tokio::test]
async fn status_json_when_running_includes_session() {
    let s = setup();
    s.manager.start(None, &[]).await.unwrap();
    let mut out = Vec::new();

    status(&s.manager, true, &mut out).await.unwrap();

    let out = text(out);
    assert!(out.contains("\n  \"running\": true"), "pretty-printed: {out}");
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["session"], SESSION);
    assert_eq!(value["rig_name"], "alpha");
}

#[tokio::test]
async fn status_text_shows_state() {
    let s = setup();
    let mut out = Vec::new();
    status(&s.manager, false, &mut out).await.unwrap();
    let stopped = text(out);
    assert!(stopped.contains("alpha"));
    assert!(stopped.contains("○ stopped"));

    s.manager.start(None, &[]).await.unwrap();
    let mut out = Vec::new();
    status(&s.manager, false, &mut out).await.unwrap();
    let running = text(out);
    assert!(running.contains("● running"));
    assert!(running.contains(&format!("Session: {}", SESSION)));
}

#[tokio::test]
async fn status_text_flags_zombie() {
    let s = setup();
    s.sessions.add_session(SESSION, false);
    let mut out = Vec::new();
    status(&s.manager, false, &mut out).await.unwrap();
    assert!(text(out).contains("zombie"));
}

#[tokio::test]
async fn restart_reports_fresh_session() {
    let s = setup();
    s.manager.start(None, &[]).await.unwrap();
    let before = s.sessions.get_session(SESSION).unwrap().pid;
    let mut out = Vec::new();

    restart_cmd(&s.manager, &LaunchArgs::default(), &mut out)
        .await
        .unwrap();

    assert!(text(out).contains("Architect restarted for alpha"));
    assert_ne!(s.sessions.get_session(SESSION).unwrap().pid, before);
}

#[tokio::test]
async fn restart_failure_is_an_error() {
    let s = setup();
    s.sessions.set_agent_starts(false);
    let mut out = Vec::new();

    let err = restart_cmd(&s.manager, &LaunchArgs::default(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LifecycleError>(),
        Some(LifecycleError::StartupTimeout { .. })
    ));
}

#[tokio::test]
async fn ensure_started_accepts_running_session() {
    let s = setup();
    let mut out = Vec::new();
    ensure_started(&s.manager, &mut out).await.unwrap();
    assert!(text(out).contains("Started architect session for alpha"));

    let mut out = Vec::new();
    ensure_started(&s.manager, &mut out).await.unwrap();
    assert!(text(out).is_empty());
}
