// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake startup composer for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{agent_env, ComposeError, RuntimeConfig, StartupComposer};
use gt_core::Role;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded composer call
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerCall {
    ResolveRuntimeConfig {
        town_root: PathBuf,
        rig_path: PathBuf,
    },
    EnsureSettings {
        dir: PathBuf,
        work_dir: PathBuf,
    },
    BuildLaunchCommand {
        prompt: String,
        agent_override: Option<String>,
    },
    ComputeEnv {
        rig_name: String,
    },
}

struct FakeComposerState {
    calls: Vec<ComposerCall>,
    runtime: RuntimeConfig,
    fail_resolve: bool,
    fail_settings: bool,
    extra_env: BTreeMap<String, String>,
}

/// Composer that launches a fixed agent command and records every call
#[derive(Clone)]
pub struct FakeComposer {
    inner: Arc<Mutex<FakeComposerState>>,
}

impl Default for FakeComposer {
    fn default() -> Self {
        let runtime = RuntimeConfig {
            agent: "claude".to_string(),
            command: "claude".to_string(),
            args: Vec::new(),
            process_names: vec!["claude".to_string()],
            uses_settings_dir: true,
        };
        Self {
            inner: Arc::new(Mutex::new(FakeComposerState {
                calls: Vec::new(),
                runtime,
                fail_resolve: false,
                fail_settings: false,
                extra_env: BTreeMap::new(),
            })),
        }
    }
}

impl FakeComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ComposerCall> {
        self.inner.lock().calls.clone()
    }

    /// Make config resolution fail with an invalid-config error
    pub fn fail_resolve(&self) {
        self.inner.lock().fail_resolve = true;
    }

    /// Make settings materialization fail
    pub fn fail_settings(&self) {
        self.inner.lock().fail_settings = true;
    }

    /// Add a variable to the computed environment
    pub fn set_env(&self, key: &str, value: &str) {
        self.inner
            .lock()
            .extra_env
            .insert(key.to_string(), value.to_string());
    }
}

impl StartupComposer for FakeComposer {
    fn resolve_runtime_config(
        &self,
        _role: Role,
        town_root: &Path,
        rig_path: &Path,
    ) -> Result<RuntimeConfig, ComposeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ComposerCall::ResolveRuntimeConfig {
            town_root: town_root.to_path_buf(),
            rig_path: rig_path.to_path_buf(),
        });
        if inner.fail_resolve {
            return Err(ComposeError::Config {
                path: town_root.join("settings/config.toml"),
                message: "scripted failure".to_string(),
            });
        }
        Ok(inner.runtime.clone())
    }

    fn ensure_settings(
        &self,
        dir: &Path,
        work_dir: &Path,
        _role: Role,
        _config: &RuntimeConfig,
    ) -> Result<(), ComposeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ComposerCall::EnsureSettings {
            dir: dir.to_path_buf(),
            work_dir: work_dir.to_path_buf(),
        });
        if inner.fail_settings {
            return Err(ComposeError::Settings {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "scripted"),
            });
        }
        Ok(())
    }

    fn build_launch_command(
        &self,
        _role: Role,
        _rig_name: &str,
        _town_root: &Path,
        _rig_path: &Path,
        prompt: &str,
        agent_override: Option<&str>,
    ) -> Result<String, ComposeError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ComposerCall::BuildLaunchCommand {
            prompt: prompt.to_string(),
            agent_override: agent_override.map(String::from),
        });
        let agent = match agent_override {
            Some(alias) => RuntimeConfig::preset(alias)
                .ok_or_else(|| ComposeError::UnknownAgent(alias.to_string()))?
                .command,
            None => inner.runtime.command.clone(),
        };
        Ok(format!("{} \"{}\"", agent, prompt))
    }

    fn compute_env(&self, role: Role, rig_name: &str, town_root: &Path) -> BTreeMap<String, String> {
        let mut inner = self.inner.lock();
        inner.calls.push(ComposerCall::ComputeEnv {
            rig_name: rig_name.to_string(),
        });
        let mut env = agent_env(role, rig_name, town_root);
        env.extend(inner.extra_env.clone());
        env
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
