// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gt architect` - Architect session management

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::color;
use crate::lock::SessionLock;
use crate::workspace;
use gt_adapters::{
    BdRegistrar, IdentityRegistrar, SessionAdapter, StartupComposer, TmuxAdapter, TownComposer,
    TracedSession,
};
use gt_core::{Rig, SessionLiveness};
use gt_engine::{restart, ArchitectManager, LifecycleConfig, LifecycleError, StartReport};

#[derive(Args)]
pub struct ArchitectArgs {
    #[command(subcommand)]
    pub command: ArchitectCommand,
}

#[derive(Subcommand)]
pub enum ArchitectCommand {
    /// Start the architect
    #[command(alias = "spawn")]
    Start {
        /// Rig name
        rig: String,
        #[command(flatten)]
        launch: LaunchArgs,
    },
    /// Stop the architect
    Stop {
        /// Rig name
        rig: String,
    },
    /// Show architect status
    Status {
        /// Rig name
        rig: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Attach to the architect session, starting it if needed
    #[command(alias = "at")]
    Attach {
        /// Rig name (inferred from the current directory if omitted)
        rig: Option<String>,
    },
    /// Restart the architect
    Restart {
        /// Rig name
        rig: String,
        #[command(flatten)]
        launch: LaunchArgs,
    },
}

/// Flags shared by `start` and `restart`
#[derive(Args, Debug, Clone, Default)]
pub struct LaunchArgs {
    /// Agent alias to run the architect with (overrides town default)
    #[arg(long)]
    pub agent: Option<String>,
    /// Environment variable override (KEY=VALUE, can be repeated)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,
}

type TownManager = ArchitectManager<TracedSession<TmuxAdapter>, BdRegistrar, TownComposer>;

fn manager(rig: Rig) -> TownManager {
    ArchitectManager::new(
        rig,
        TracedSession::new(TmuxAdapter::new()),
        BdRegistrar::new(),
        TownComposer::new(),
        LifecycleConfig::from_env(),
    )
}

async fn lock<S, I, C>(manager: &ArchitectManager<S, I, C>) -> Result<SessionLock>
where
    S: SessionAdapter,
    I: IdentityRegistrar,
    C: StartupComposer,
{
    let session = manager.session_name();
    SessionLock::acquire(&manager.town_root(), session.as_str())
        .await
        .with_context(|| format!("locking {}", session))
}

pub async fn handle(command: ArchitectCommand, cwd: &Path) -> Result<()> {
    let town_root = workspace::resolve_town_root(cwd)?;
    let mut out = std::io::stdout();

    match command {
        ArchitectCommand::Start { rig, launch } => {
            let manager = manager(workspace::load_rig_in_service(&town_root, &rig)?);
            let _lock = lock(&manager).await?;
            start(&manager, &launch, &mut out).await
        }
        ArchitectCommand::Stop { rig } => {
            let manager = manager(workspace::load_rig(&town_root, &rig)?);
            let _lock = lock(&manager).await?;
            stop(&manager, &mut out).await
        }
        ArchitectCommand::Status { rig, json } => {
            let manager = manager(workspace::load_rig(&town_root, &rig)?);
            status(&manager, json, &mut out).await
        }
        ArchitectCommand::Attach { rig } => {
            let rig = workspace::rig_name_or_infer(&town_root, rig, cwd)?;
            let manager = manager(workspace::load_rig(&town_root, &rig)?);
            {
                let _lock = lock(&manager).await?;
                ensure_started(&manager, &mut out).await?;
            }
            attach(manager.session_name().as_str())
        }
        ArchitectCommand::Restart { rig, launch } => {
            let manager = manager(workspace::load_rig_in_service(&town_root, &rig)?);
            let _lock = lock(&manager).await?;
            restart_cmd(&manager, &launch, &mut out).await
        }
    }
}

pub async fn start<S, I, C>(
    manager: &ArchitectManager<S, I, C>,
    launch: &LaunchArgs,
    out: &mut impl Write,
) -> Result<()>
where
    S: SessionAdapter,
    I: IdentityRegistrar,
    C: StartupComposer,
{
    let rig = &manager.rig().name;
    writeln!(out, "Starting architect for {}...", rig)?;

    match manager.start(launch.agent.as_deref(), &launch.env).await {
        Ok(report) => {
            writeln!(out, "{} Architect started for {}", color::green("✓"), rig)?;
            print_warnings(&report, out)?;
            writeln!(out, "  {}", color::muted("Use 'gt architect attach' to connect"))?;
            writeln!(
                out,
                "  {}",
                color::muted("Use 'gt architect status' to check progress")
            )?;
            Ok(())
        }
        Err(LifecycleError::AlreadyRunning(_)) => {
            writeln!(out, "{} Architect is already running", color::yellow("⚠"))?;
            writeln!(out, "  {}", color::muted("Use 'gt architect attach' to connect"))?;
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context("starting architect")),
    }
}

pub async fn stop<S, I, C>(manager: &ArchitectManager<S, I, C>, out: &mut impl Write) -> Result<()>
where
    S: SessionAdapter,
    I: IdentityRegistrar,
    C: StartupComposer,
{
    match manager.stop().await {
        Ok(()) => {
            writeln!(
                out,
                "{} Architect stopped for {}",
                color::green("✓"),
                manager.rig().name
            )?;
            Ok(())
        }
        Err(LifecycleError::NotRunning(_)) => {
            writeln!(out, "{} Architect is not running", color::yellow("⚠"))?;
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context("stopping architect")),
    }
}

/// JSON shape of `gt architect status --json`
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub running: bool,
    pub rig_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

pub async fn status<S, I, C>(
    manager: &ArchitectManager<S, I, C>,
    json: bool,
    out: &mut impl Write,
) -> Result<()>
where
    S: SessionAdapter,
    I: IdentityRegistrar,
    C: StartupComposer,
{
    let running = manager.is_running().await;
    let info = match manager.status().await {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::debug!(error = %e, "no session info");
            None
        }
    };
    let rig = &manager.rig().name;

    if json {
        let output = StatusOutput {
            running,
            rig_name: rig.clone(),
            session: info.map(|i| i.name),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    writeln!(out, "{} {}", color::header("Architect:"), rig)?;
    writeln!(out)?;
    if !running {
        writeln!(out, "  State: {}", color::yellow("○ stopped"))?;
        return Ok(());
    }
    let state = match manager.liveness().await {
        Ok(SessionLiveness::Zombie) => color::yellow("◐ zombie (agent exited)"),
        _ => color::green("● running"),
    };
    writeln!(out, "  State: {}", state)?;
    if let Some(info) = info {
        writeln!(out, "  Session: {}", info.name)?;
        writeln!(
            out,
            "  Attached: {}",
            if info.attached { "yes" } else { "no" }
        )?;
    }
    Ok(())
}

pub async fn restart_cmd<S, I, C>(
    manager: &ArchitectManager<S, I, C>,
    launch: &LaunchArgs,
    out: &mut impl Write,
) -> Result<()>
where
    S: SessionAdapter,
    I: IdentityRegistrar,
    C: StartupComposer,
{
    let rig = &manager.rig().name;
    writeln!(out, "Restarting architect for {}...", rig)?;
    let report = restart(manager, launch.agent.as_deref(), &launch.env)
        .await
        .context("starting architect")?;
    writeln!(out, "{} Architect restarted for {}", color::green("✓"), rig)?;
    print_warnings(&report, out)?;
    writeln!(out, "  {}", color::muted("Use 'gt architect attach' to connect"))?;
    Ok(())
}

/// Start the session unless a healthy one is already there.
pub async fn ensure_started<S, I, C>(
    manager: &ArchitectManager<S, I, C>,
    out: &mut impl Write,
) -> Result<()>
where
    S: SessionAdapter,
    I: IdentityRegistrar,
    C: StartupComposer,
{
    match manager.start(None, &[]).await {
        Ok(report) => {
            writeln!(
                out,
                "Started architect session for {}",
                manager.rig().name
            )?;
            print_warnings(&report, out)?;
            Ok(())
        }
        Err(LifecycleError::AlreadyRunning(_)) => Ok(()),
        Err(e) => Err(anyhow::Error::new(e).context("starting architect")),
    }
}

/// Hand the terminal to the session (switch clients when already inside tmux).
fn attach(session: &str) -> Result<()> {
    let verb = if crate::env::inside_tmux() {
        "switch-client"
    } else {
        "attach-session"
    };
    let status = std::process::Command::new("tmux")
        .args([verb, "-t", session])
        .status()
        .context("running tmux")?;

    if !status.success() {
        anyhow::bail!("Failed to attach to session {}", session);
    }
    Ok(())
}

/// Step names only; the details went to the log as they happened.
fn print_warnings(report: &StartReport, out: &mut impl Write) -> Result<()> {
    if report.warnings.is_empty() {
        return Ok(());
    }
    let steps: Vec<String> = report.warnings.iter().map(|w| w.step.to_string()).collect();
    writeln!(
        out,
        "  {} {}",
        color::yellow("⚠"),
        color::context(&format!("Started with warnings: {}", steps.join(", ")))
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "architect_tests.rs"]
mod tests;
