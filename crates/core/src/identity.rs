// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent identity records ("beads") used for mail routing.
//!
//! An identity record is independent of session liveness: it may exist while
//! the agent's session is absent.

use crate::role::Role;
use serde::{Deserialize, Serialize};

/// Prefix used when a rig does not configure its own.
pub const DEFAULT_PREFIX: &str = "gt";

crate::define_id! {
    /// Identifier of an agent identity record, e.g. `gt-copperhead-architect`.
    pub struct IdentityId;
}

/// Identity id for `role` in `rig`, namespaced by the rig's record prefix.
pub fn agent_identity_id(prefix: &str, rig: &str, role: Role) -> IdentityId {
    let prefix = if prefix.is_empty() {
        DEFAULT_PREFIX
    } else {
        prefix
    };
    IdentityId(format!("{}-{}-{}", prefix, rig, role))
}

/// Mail address other actors use to reach the agent (`rig/role`).
pub fn mail_address(rig: &str, role: Role) -> String {
    format!("{}/{}", rig, role)
}

/// Role fields attached to an agent identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFields {
    pub role_type: Role,
    pub rig: String,
    pub agent_state: String,
}

impl AgentFields {
    /// Fields for a freshly registered, idle agent.
    pub fn idle(role: Role, rig: impl Into<String>) -> Self {
        Self {
            role_type: role,
            rig: rig.into(),
            agent_state: "idle".to_string(),
        }
    }

    /// Render as `key: value` lines, the layout the registry stores in a
    /// record's description body.
    pub fn to_description_lines(&self) -> String {
        format!(
            "role_type: {}\nrig: {}\nagent_state: {}",
            self.role_type, self.rig, self.agent_state
        )
    }
}

/// An identity record as stored by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: IdentityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
