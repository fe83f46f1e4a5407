// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup composition: which agent runs for a role, how it is launched,
//! and what settings and environment it starts with.

mod town;

pub use town::TownComposer;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ComposerCall, FakeComposer};

use gt_core::{session_name, Role};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Agent used when neither the rig nor the town picks one.
pub const DEFAULT_AGENT: &str = "claude";

/// Errors from resolving or materializing startup configuration
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("unknown agent {0:?}")]
    UnknownAgent(String),
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
    #[error("failed to write settings in {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolved agent runtime for a role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Agent alias, e.g. `claude`
    pub agent: String,
    pub command: String,
    pub args: Vec<String>,
    /// Process names that identify the running agent inside a session
    pub process_names: Vec<String>,
    /// Whether the agent reads a materialized `settings.json`
    pub uses_settings_dir: bool,
}

impl RuntimeConfig {
    /// Built-in runtime for a known agent alias
    pub fn preset(agent: &str) -> Option<Self> {
        let (command, args, names): (&str, &[&str], &[&str]) = match agent {
            "claude" => ("claude", &["--dangerously-skip-permissions"], &["claude", "node"]),
            "codex" => ("codex", &["--yolo"], &["codex"]),
            "gemini" => ("gemini", &["--approval-mode", "yolo"], &["gemini", "node"]),
            _ => return None,
        };
        Some(Self {
            agent: agent.to_string(),
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            process_names: names.iter().map(|s| s.to_string()).collect(),
            uses_settings_dir: command == "claude",
        })
    }
}

/// Process names of the default agent, used when configuration cannot be read.
pub fn default_process_names() -> Vec<String> {
    RuntimeConfig::preset(DEFAULT_AGENT)
        .map(|c| c.process_names)
        .unwrap_or_default()
}

/// Resolves role and rig configuration into what a session needs to start.
///
/// Implementations read configuration synchronously; nothing here talks to
/// the session driver.
pub trait StartupComposer: Send + Sync + 'static {
    /// Resolve the agent runtime for `role` in the rig at `rig_path`
    fn resolve_runtime_config(
        &self,
        role: Role,
        town_root: &Path,
        rig_path: &Path,
    ) -> Result<RuntimeConfig, ComposeError>;

    /// Runtime for the agent alias `agent`, as passed to `--agent`
    fn resolve_agent_runtime(
        &self,
        _role: Role,
        _town_root: &Path,
        _rig_path: &Path,
        agent: &str,
    ) -> Result<RuntimeConfig, ComposeError> {
        RuntimeConfig::preset(agent).ok_or_else(|| ComposeError::UnknownAgent(agent.to_string()))
    }

    /// Directory holding the role's agent settings
    fn settings_dir(&self, role: Role, rig_path: &Path) -> PathBuf {
        rig_path.join(role.as_str()).join(".claude")
    }

    /// Materialize the settings the agent expects in `dir`
    fn ensure_settings(
        &self,
        dir: &Path,
        work_dir: &Path,
        role: Role,
        config: &RuntimeConfig,
    ) -> Result<(), ComposeError>;

    /// Full shell command that launches the agent with `prompt`.
    ///
    /// `agent_override` replaces the configured agent alias.
    fn build_launch_command(
        &self,
        role: Role,
        rig_name: &str,
        town_root: &Path,
        rig_path: &Path,
        prompt: &str,
        agent_override: Option<&str>,
    ) -> Result<String, ComposeError>;

    /// Environment derived from role, rig and town
    fn compute_env(&self, role: Role, rig_name: &str, town_root: &Path) -> BTreeMap<String, String> {
        agent_env(role, rig_name, town_root)
    }
}

/// Role- and rig-derived environment for an agent session.
pub fn agent_env(role: Role, rig_name: &str, town_root: &Path) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert("GT_ROLE".to_string(), role.to_string());
    env.insert("GT_RIG".to_string(), rig_name.to_string());
    env.insert(
        "GT_TOWN_ROOT".to_string(),
        town_root.display().to_string(),
    );
    env.insert(
        "GT_SESSION".to_string(),
        session_name(rig_name, role).to_string(),
    );
    env.insert("BD_ACTOR".to_string(), format!("{}/{}", rig_name, role));
    env.insert(
        "GIT_AUTHOR_NAME".to_string(),
        format!("{}-{}", rig_name, role),
    );
    env
}

/// Escape a string for embedding inside double quotes in a shell command.
///
/// Characters escaped: `\`, `` ` ``, `$`, `"`.
pub fn escape_for_shell_double_quotes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '`' => result.push_str("\\`"),
            '$' => result.push_str("\\$"),
            '"' => result.push_str("\\\""),
            _ => result.push(c),
        }
    }
    result
}

/// Quote a word for the shell unless it is made only of safe characters.
pub fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@%+".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
