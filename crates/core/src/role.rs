// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent roles hosted in a rig

use serde::{Deserialize, Serialize};
use std::fmt;

/// The functional kind of agent a session hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Independent quality authority for a rig
    Architect,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Architect => "architect",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
