// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locating the town and the rig a command operates on

use anyhow::{Context, Result};
use gt_core::{find_town_root, infer_rig_from_path, Rig};
use std::path::{Path, PathBuf};

/// Town root from `GT_TOWN_ROOT`, else discovered by walking up from `cwd`.
pub fn resolve_town_root(cwd: &Path) -> Result<PathBuf> {
    town_root_from(crate::env::town_root(), cwd)
}

fn town_root_from(explicit: Option<PathBuf>, cwd: &Path) -> Result<PathBuf> {
    if let Some(root) = explicit {
        if !root.is_dir() {
            anyhow::bail!("GT_TOWN_ROOT is not a directory: {}", root.display());
        }
        return Ok(root);
    }
    find_town_root(cwd).context("not in a Gas Town workspace")
}

/// Load a rig of the town by name.
pub fn load_rig(town_root: &Path, name: &str) -> Result<Rig> {
    Ok(Rig::load(town_root, name)?)
}

/// Load a rig that may have agents started in it (not parked or docked).
pub fn load_rig_in_service(town_root: &Path, name: &str) -> Result<Rig> {
    let rig = load_rig(town_root, name)?;
    rig.ensure_in_service()?;
    Ok(rig)
}

/// Rig named on the command line, or the one containing `cwd`.
pub fn rig_name_or_infer(town_root: &Path, name: Option<String>, cwd: &Path) -> Result<String> {
    match name {
        Some(name) => Ok(name),
        None => infer_rig_from_path(town_root, cwd).map_err(|e| {
            anyhow::anyhow!(
                "could not determine rig: {}\nUsage: gt architect attach <rig>",
                e
            )
        }),
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
