// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session naming and liveness.
//!
//! A session name is derived from (rig, role) on every call and is the only
//! handle on the hosted agent. Nothing about a session is stored locally: the
//! multiplexer's session table is the source of truth.

use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Name of a multiplexer session, e.g. `gt-copperhead-architect`.
    pub struct SessionName;
}

/// Session name for `role` in the rig named `rig_name`.
pub fn session_name(rig_name: &str, role: Role) -> SessionName {
    SessionName(format!("gt-{}-{}", rig_name, role))
}

/// Liveness of a session, derived from the multiplexer on each query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionLiveness {
    /// No entry in the session table
    Absent,
    /// Session exists but the hosted agent process is gone
    Zombie,
    /// Session exists and the hosted agent process is running
    Healthy,
}

impl fmt::Display for SessionLiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionLiveness::Absent => write!(f, "absent"),
            SessionLiveness::Zombie => write!(f, "zombie"),
            SessionLiveness::Healthy => write!(f, "healthy"),
        }
    }
}

/// Session metadata as reported by the multiplexer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub name: String,
    pub windows: u32,
    /// Creation time (unix seconds)
    pub created: u64,
    pub attached: bool,
    /// Last activity time (unix seconds)
    pub activity: u64,
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
