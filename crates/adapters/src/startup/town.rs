// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composer backed by town and rig config files.
//!
//! Both `<town>/settings/config.toml` and `<rig>/settings/config.toml` are
//! optional and share one layout:
//!
//! ```toml
//! default_agent = "claude"
//!
//! [role_agents]
//! architect = "codex"
//!
//! [agents.claude-opus]
//! command = "claude"
//! args = ["--dangerously-skip-permissions", "--model", "opus"]
//! process_names = ["claude", "node"]
//! ```
//!
//! Rig values take precedence over town values.

use super::{
    agent_env, escape_for_shell_double_quotes, shell_quote, ComposeError, RuntimeConfig,
    StartupComposer, DEFAULT_AGENT,
};
use gt_core::Role;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings/config.toml";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ComposerFile {
    default_agent: Option<String>,
    role_agents: HashMap<String, String>,
    agents: HashMap<String, AgentEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct AgentEntry {
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    process_names: Vec<String>,
}

/// Composer reading TOML config from the town and rig `settings/` directories
#[derive(Debug, Clone, Default)]
pub struct TownComposer;

impl TownComposer {
    pub fn new() -> Self {
        Self
    }

    fn resolve(
        &self,
        role: Role,
        town_root: &Path,
        rig_path: &Path,
        agent_override: Option<&str>,
    ) -> Result<RuntimeConfig, ComposeError> {
        let town = load_file(&town_root.join(CONFIG_FILE))?;
        let rig = load_file(&rig_path.join(CONFIG_FILE))?;

        let alias = agent_override
            .filter(|a| !a.is_empty())
            .map(String::from)
            .or_else(|| rig.role_agents.get(role.as_str()).cloned())
            .or_else(|| town.role_agents.get(role.as_str()).cloned())
            .or_else(|| rig.default_agent.clone())
            .or_else(|| town.default_agent.clone())
            .unwrap_or_else(|| DEFAULT_AGENT.to_string());

        let entry = rig.agents.get(&alias).or_else(|| town.agents.get(&alias));
        match entry {
            Some(entry) => Ok(runtime_from_entry(&alias, entry)),
            None => RuntimeConfig::preset(&alias).ok_or(ComposeError::UnknownAgent(alias)),
        }
    }
}

impl StartupComposer for TownComposer {
    fn resolve_runtime_config(
        &self,
        role: Role,
        town_root: &Path,
        rig_path: &Path,
    ) -> Result<RuntimeConfig, ComposeError> {
        self.resolve(role, town_root, rig_path, None)
    }

    fn resolve_agent_runtime(
        &self,
        role: Role,
        town_root: &Path,
        rig_path: &Path,
        agent: &str,
    ) -> Result<RuntimeConfig, ComposeError> {
        self.resolve(role, town_root, rig_path, Some(agent))
    }

    fn ensure_settings(
        &self,
        dir: &Path,
        work_dir: &Path,
        role: Role,
        config: &RuntimeConfig,
    ) -> Result<(), ComposeError> {
        if !config.uses_settings_dir {
            return Ok(());
        }
        let path = dir.join(SETTINGS_FILE);
        if path.exists() {
            return Ok(());
        }
        let settings_err = |source| ComposeError::Settings {
            path: dir.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(dir).map_err(settings_err)?;
        let body = serde_json::to_string_pretty(&role_settings(work_dir, role))
            .map_err(|e| settings_err(std::io::Error::other(e)))?;
        std::fs::write(&path, body + "\n").map_err(settings_err)?;
        tracing::info!(path = %path.display(), %role, "wrote agent settings");
        Ok(())
    }

    fn build_launch_command(
        &self,
        role: Role,
        rig_name: &str,
        town_root: &Path,
        rig_path: &Path,
        prompt: &str,
        agent_override: Option<&str>,
    ) -> Result<String, ComposeError> {
        let config = self.resolve(role, town_root, rig_path, agent_override)?;

        let mut words = vec!["exec".to_string(), "env".to_string()];
        for (key, value) in agent_env(role, rig_name, town_root) {
            words.push(format!("{}={}", key, shell_quote(&value)));
        }
        words.push(shell_quote(&config.command));
        words.extend(config.args.iter().map(|a| shell_quote(a)));
        if config.uses_settings_dir {
            let settings = self.settings_dir(role, rig_path).join(SETTINGS_FILE);
            words.push("--settings".to_string());
            words.push(shell_quote(&settings.display().to_string()));
        }
        if !prompt.is_empty() {
            words.push(format!("\"{}\"", escape_for_shell_double_quotes(prompt)));
        }
        Ok(words.join(" "))
    }
}

fn load_file(path: &Path) -> Result<ComposerFile, ComposeError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ComposerFile::default()),
        Err(e) => return Err(config_error(path, e.to_string())),
    };
    toml::from_str(&content).map_err(|e| config_error(path, e.to_string()))
}

fn config_error(path: &Path, message: String) -> ComposeError {
    ComposeError::Config {
        path: PathBuf::from(path),
        message,
    }
}

fn runtime_from_entry(alias: &str, entry: &AgentEntry) -> RuntimeConfig {
    let program = Path::new(&entry.command)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&entry.command)
        .to_string();
    let process_names = if entry.process_names.is_empty() {
        vec![program.clone()]
    } else {
        entry.process_names.clone()
    };
    RuntimeConfig {
        agent: alias.to_string(),
        command: entry.command.clone(),
        args: entry.args.clone(),
        process_names,
        uses_settings_dir: program == "claude",
    }
}

/// Agent settings: hooks that re-prime the agent from the role's work dir.
fn role_settings(work_dir: &Path, role: Role) -> serde_json::Value {
    let prime = format!(
        "cd {} && GT_ROLE={} gt prime --hook",
        shell_quote(&work_dir.display().to_string()),
        role
    );
    let hook = |command: &str| {
        serde_json::json!([{
            "matcher": "",
            "hooks": [{ "type": "command", "command": command }]
        }])
    };
    serde_json::json!({
        "hooks": {
            "SessionStart": hook(&prime),
            "PreCompact": hook(&prime),
            "UserPromptSubmit": hook("gt mail check --inject"),
        }
    })
}

#[cfg(test)]
#[path = "town_tests.rs"]
mod tests;
