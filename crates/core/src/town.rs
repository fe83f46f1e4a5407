// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Town root discovery.
//!
//! A town is the directory that contains `mayor/town.toml`; each rig is a
//! direct child directory of the town root.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Marker file identifying a town root, relative to the root.
pub const TOWN_MARKER: &str = "mayor/town.toml";

/// Town-level directories that are never rigs.
const RESERVED_DIRS: &[&str] = &["mayor", "settings"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TownError {
    #[error("not inside a town (no {TOWN_MARKER} found above {0})")]
    NotInTown(PathBuf),
    #[error("{0} is not inside a rig")]
    NotInRig(PathBuf),
}

/// Walk up from `start` looking for the town marker.
pub fn find_town_root(start: &Path) -> Result<PathBuf, TownError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(TOWN_MARKER).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(TownError::NotInTown(start.to_path_buf()));
        }
    }
}

/// Infer the rig name from a path inside the town (the first path component
/// below the town root).
pub fn infer_rig_from_path(town_root: &Path, path: &Path) -> Result<String, TownError> {
    let not_in_rig = || TownError::NotInRig(path.to_path_buf());
    let relative = path.strip_prefix(town_root).map_err(|_| not_in_rig())?;
    match relative.components().next() {
        Some(Component::Normal(first)) => {
            let name = first.to_str().ok_or_else(not_in_rig)?;
            if name.starts_with('.') || RESERVED_DIRS.contains(&name) {
                return Err(not_in_rig());
            }
            Ok(name.to_string())
        }
        _ => Err(not_in_rig()),
    }
}

/// Read the identity-record prefix configured for a rig.
///
/// Looks for `[beads] prefix = "..."` in `<town>/<rig>/config.toml`.
pub fn rig_record_prefix(town_root: &Path, rig_name: &str) -> Option<String> {
    let content = std::fs::read_to_string(town_root.join(rig_name).join("config.toml")).ok()?;
    let table: toml::Table = content.parse().ok()?;
    table
        .get("beads")?
        .as_table()?
        .get("prefix")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
#[path = "town_tests.rs"]
mod tests;
