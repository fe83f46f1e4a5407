// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rig: a named workspace directory that hosts agents.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker files that take a rig out of service.
const PARKED_MARKER: &str = ".parked";
const DOCKED_MARKER: &str = ".docked";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RigError {
    #[error("invalid rig name {0:?}: use letters, digits, '-' or '_'")]
    InvalidName(String),
    #[error("rig not found: {0}")]
    NotFound(String),
    #[error("rig {0} is parked")]
    Parked(String),
    #[error("rig {0} is docked")]
    Docked(String),
}

/// A logical workspace: a name unique within its town and a root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rig {
    pub name: String,
    pub path: PathBuf,
}

impl Rig {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Load a rig from `<town_root>/<name>`, which must be a directory.
    pub fn load(town_root: &Path, name: &str) -> Result<Self, RigError> {
        validate_name(name)?;
        let path = town_root.join(name);
        if !path.is_dir() {
            return Err(RigError::NotFound(name.to_string()));
        }
        Ok(Self::new(name, path))
    }

    /// Fail if the rig has been parked or docked.
    pub fn ensure_in_service(&self) -> Result<(), RigError> {
        if self.path.join(PARKED_MARKER).exists() {
            return Err(RigError::Parked(self.name.clone()));
        }
        if self.path.join(DOCKED_MARKER).exists() {
            return Err(RigError::Docked(self.name.clone()));
        }
        Ok(())
    }
}

/// Rig names end up inside tmux session names and bead ids.
pub fn validate_name(name: &str) -> Result<(), RigError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RigError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
#[path = "rig_tests.rs"]
mod tests;
