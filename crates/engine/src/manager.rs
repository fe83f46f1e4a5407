// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Architect session lifecycle.
//!
//! The multiplexer session is the only state: every operation re-queries it
//! and nothing is cached between calls.

use crate::dialog::{poll_for_prompt, PromptResult, BYPASS_PERMISSIONS};
use crate::overrides::parse_env_overrides;
use crate::probe::{join_process_names, probe, AGENT_PROCESSES_ENV};
use crate::prompt::startup_prompt;
use crate::{LifecycleConfig, LifecycleError};
use gt_adapters::startup::default_process_names;
use gt_adapters::{
    gitignore, pids, IdentityError, IdentityRegistrar, SessionAdapter, SessionError, SessionStyle,
    StartupComposer,
};
use gt_core::{
    agent_identity_id, assign_theme, find_town_root, rig_record_prefix, session_name,
    AgentFields, Rig, Role, SessionInfo, SessionLiveness, SessionName,
};
use std::fmt;
use std::path::{Path, PathBuf};

const ROLE: Role = Role::Architect;

/// Best-effort start step that failed without aborting the start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupStep {
    Identity,
    Gitignore,
    Environment(String),
    Theme,
    Dialog,
    PidTracking,
}

impl fmt::Display for StartupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupStep::Identity => write!(f, "identity record"),
            StartupStep::Gitignore => write!(f, ".gitignore"),
            StartupStep::Environment(key) => write!(f, "environment {}", key),
            StartupStep::Theme => write!(f, "theme"),
            StartupStep::Dialog => write!(f, "startup dialog"),
            StartupStep::PidTracking => write!(f, "pid tracking"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupWarning {
    pub step: StartupStep,
    pub message: String,
}

impl fmt::Display for StartupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.message)
    }
}

/// Outcome of a successful start
#[derive(Debug, Clone)]
pub struct StartReport {
    pub session: SessionName,
    pub town_root: PathBuf,
    /// Whether a zombie session was killed before starting
    pub replaced_zombie: bool,
    /// Non-fatal failures, in the order they happened
    pub warnings: Vec<StartupWarning>,
}

/// Manages the architect agent session of one rig.
///
/// Not safe to `start`/`stop` the same rig from several callers at once: the
/// existence check and session creation are separate driver calls. Callers
/// serialize per session (the CLI holds a lock file for the duration).
pub struct ArchitectManager<S, I, C> {
    rig: Rig,
    sessions: S,
    identities: I,
    composer: C,
    config: LifecycleConfig,
}

impl<S, I, C> ArchitectManager<S, I, C>
where
    S: SessionAdapter,
    I: IdentityRegistrar,
    C: StartupComposer,
{
    pub fn new(rig: Rig, sessions: S, identities: I, composer: C, config: LifecycleConfig) -> Self {
        Self {
            rig,
            sessions,
            identities,
            composer,
            config,
        }
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn session_name(&self) -> SessionName {
        session_name(&self.rig.name, ROLE)
    }

    /// Town root above the rig, or the rig itself when there is none.
    pub fn town_root(&self) -> PathBuf {
        find_town_root(&self.rig.path).unwrap_or_else(|_| self.rig.path.clone())
    }

    /// Whether the session exists. Driver errors count as not running.
    pub async fn is_running(&self) -> bool {
        let session = self.session_name();
        match self.sessions.has_session(session.as_str()).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::debug!(%session, error = %e, "session check failed");
                false
            }
        }
    }

    /// Absent, zombie or healthy.
    pub async fn liveness(&self) -> Result<SessionLiveness, LifecycleError> {
        let names = self.process_names(&self.town_root());
        Ok(probe(&self.sessions, self.session_name().as_str(), &names).await?)
    }

    /// Driver-reported metadata for a running session.
    pub async fn status(&self) -> Result<SessionInfo, LifecycleError> {
        let session = self.session_name();
        if !self.sessions.has_session(session.as_str()).await? {
            return Err(LifecycleError::NotRunning(session));
        }
        Ok(self.sessions.session_info(session.as_str()).await?)
    }

    /// Start the agent session.
    ///
    /// A healthy session is left alone (`AlreadyRunning`); a zombie is killed
    /// and replaced. Identity, gitignore, environment, theme, dialog and pid
    /// failures are collected as warnings.
    pub async fn start(
        &self,
        agent_override: Option<&str>,
        env_overrides: &[String],
    ) -> Result<StartReport, LifecycleError> {
        let session = self.session_name();
        let id = session.as_str();
        let town_root = self.town_root();
        let work_dir = self.rig.path.as_path();

        let replaced_zombie = match probe(&self.sessions, id, &self.process_names(&town_root)).await? {
            SessionLiveness::Healthy => return Err(LifecycleError::AlreadyRunning(session)),
            SessionLiveness::Zombie => {
                tracing::info!(%session, "agent not running in session, replacing zombie");
                self.sessions
                    .kill_with_processes(id)
                    .await
                    .map_err(LifecycleError::ZombieCleanup)?;
                true
            }
            SessionLiveness::Absent => false,
        };

        let mut warnings = Warnings::new(&session);

        if let Err(e) = self.ensure_identity(&town_root).await {
            warnings.push(StartupStep::Identity, e);
        }

        let runtime = self
            .composer
            .resolve_runtime_config(ROLE, &town_root, &self.rig.path)
            .map_err(LifecycleError::ConfigResolution)?;
        let settings_dir = self.composer.settings_dir(ROLE, &self.rig.path);
        self.composer
            .ensure_settings(&settings_dir, work_dir, ROLE, &runtime)
            .map_err(LifecycleError::ConfigResolution)?;

        if let Err(e) = gitignore::ensure_gitignore_patterns(work_dir) {
            warnings.push(StartupStep::Gitignore, e);
        }

        let prompt = startup_prompt(&self.rig.name);
        let command = self
            .composer
            .build_launch_command(
                ROLE,
                &self.rig.name,
                &town_root,
                &self.rig.path,
                &prompt,
                agent_override,
            )
            .map_err(LifecycleError::ConfigResolution)?;
        let launched = match agent_override {
            Some(agent) => self
                .composer
                .resolve_agent_runtime(ROLE, &town_root, &self.rig.path, agent)
                .map_err(LifecycleError::ConfigResolution)?,
            None => runtime,
        };

        self.sessions
            .spawn(id, work_dir, &command)
            .await
            .map_err(LifecycleError::SessionCreation)?;

        // Overrides go last so they win over computed defaults
        let mut env: Vec<(String, String)> = self
            .composer
            .compute_env(ROLE, &self.rig.name, &town_root)
            .into_iter()
            .collect();
        env.push((
            AGENT_PROCESSES_ENV.to_string(),
            join_process_names(&launched.process_names),
        ));
        env.extend(parse_env_overrides(env_overrides));
        for (key, value) in &env {
            if let Err(e) = self.sessions.set_environment(id, key, value).await {
                warnings.push(StartupStep::Environment(key.clone()), e);
            }
        }

        if let Err(e) = self.sessions.configure(id, &self.style()).await {
            warnings.push(StartupStep::Theme, e);
        }

        if let Err(e) = self
            .sessions
            .wait_for_command(id, &self.config.supported_shells, self.config.startup_timeout)
            .await
        {
            if let Err(kill_err) = self.sessions.kill_with_processes(id).await {
                tracing::warn!(%session, error = %kill_err, "failed to clean up session after failed start");
            }
            return Err(match e {
                SessionError::Timeout { .. } => LifecycleError::StartupTimeout {
                    session,
                    timeout: self.config.startup_timeout,
                },
                other => LifecycleError::Session(other),
            });
        }

        match poll_for_prompt(
            &self.sessions,
            id,
            self.config.prompt_poll_attempts,
            self.config.prompt_poll_interval,
            &BYPASS_PERMISSIONS,
        )
        .await
        {
            Ok(PromptResult::Handled) => tracing::info!(%session, "bypass permissions prompt accepted"),
            Ok(PromptResult::NotPresent) => tracing::debug!(%session, "no bypass permissions prompt"),
            Err(e) => warnings.push(StartupStep::Dialog, e),
        }

        if let Err(e) = self.track_pid(&town_root, id).await {
            warnings.push(StartupStep::PidTracking, e);
        }

        tokio::time::sleep(self.config.settle_delay).await;

        tracing::info!(%session, agent = %launched.agent, "architect started");
        let warnings = warnings.into_inner();
        Ok(StartReport {
            session,
            town_root,
            replaced_zombie,
            warnings,
        })
    }

    /// Kill the session and the processes in it.
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let session = self.session_name();
        if !self.sessions.has_session(session.as_str()).await? {
            return Err(LifecycleError::NotRunning(session));
        }
        self.sessions.kill_with_processes(session.as_str()).await?;
        if let Err(e) = pids::remove_tracked_pid(&self.town_root(), session.as_str()) {
            tracing::debug!(%session, error = %e, "failed to remove tracked pid");
        }
        tracing::info!(%session, "architect stopped");
        Ok(())
    }

    /// Process names of the configured agent, for sessions that do not
    /// record their own.
    fn process_names(&self, town_root: &Path) -> Vec<String> {
        match self
            .composer
            .resolve_runtime_config(ROLE, town_root, &self.rig.path)
        {
            Ok(runtime) if !runtime.process_names.is_empty() => runtime.process_names,
            Ok(_) => default_process_names(),
            Err(e) => {
                tracing::debug!(rig = %self.rig.name, error = %e, "using default agent process names");
                default_process_names()
            }
        }
    }

    /// Look up the agent's identity record, creating it when missing.
    async fn ensure_identity(&self, town_root: &Path) -> Result<(), IdentityError> {
        let prefix = rig_record_prefix(town_root, &self.rig.name).unwrap_or_default();
        let id = agent_identity_id(&prefix, &self.rig.name, ROLE);
        if self.identities.lookup(town_root, &id).await.is_ok() {
            return Ok(());
        }
        let description = format!(
            "Architect for {} - independent quality authority.",
            self.rig.name
        );
        let fields = AgentFields::idle(ROLE, self.rig.name.clone());
        self.identities
            .create(town_root, &id, &description, &fields)
            .await
            .map(|_| ())
    }

    async fn track_pid(&self, town_root: &Path, id: &str) -> Result<(), String> {
        let pid = self.sessions.pane_pid(id).await.map_err(|e| e.to_string())?;
        pids::track_session_pid(town_root, id, pid).map_err(|e| e.to_string())
    }

    fn style(&self) -> SessionStyle {
        let theme = assign_theme(&self.rig.name);
        let label = format!("{}/{}", self.rig.name, ROLE);
        SessionStyle {
            status_style: theme.status_style(),
            title: label.clone(),
            status_left: label,
            status_right: theme.name.to_string(),
        }
    }
}

/// Stop (ignoring any error), then start.
///
/// Nothing is restored if the start fails.
pub async fn restart<S, I, C>(
    manager: &ArchitectManager<S, I, C>,
    agent_override: Option<&str>,
    env_overrides: &[String],
) -> Result<StartReport, LifecycleError>
where
    S: SessionAdapter,
    I: IdentityRegistrar,
    C: StartupComposer,
{
    if let Err(e) = manager.stop().await {
        tracing::debug!(session = %manager.session_name(), error = %e, "stop before restart");
    }
    manager.start(agent_override, env_overrides).await
}

/// Collects and logs best-effort step failures.
struct Warnings<'a> {
    session: &'a SessionName,
    items: Vec<StartupWarning>,
}

impl<'a> Warnings<'a> {
    fn new(session: &'a SessionName) -> Self {
        Self {
            session,
            items: Vec::new(),
        }
    }

    fn push(&mut self, step: StartupStep, error: impl fmt::Display) {
        let message = error.to_string();
        tracing::warn!(session = %self.session, %step, error = %message, "start step failed, continuing");
        self.items.push(StartupWarning { step, message });
    }

    fn into_inner(self) -> Vec<StartupWarning> {
        self.items
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
