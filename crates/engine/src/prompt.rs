// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup prompt handed to a freshly launched agent

use gt_core::{mail_address, Role};

/// Addressing line that tells the agent who it is and who woke it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beacon {
    pub recipient: String,
    pub sender: String,
    pub topic: String,
}

impl std::fmt::Display for Beacon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[GAS TOWN] {} <- {} • {}",
            self.recipient, self.sender, self.topic
        )
    }
}

/// Beacon followed by a blank line and `instructions`.
pub fn build_startup_prompt(beacon: &Beacon, instructions: &str) -> String {
    if instructions.is_empty() {
        return beacon.to_string();
    }
    format!("{}\n\n{}", beacon, instructions)
}

/// Prompt for the architect of `rig_name`: check the inbox for review requests.
pub fn startup_prompt(rig_name: &str) -> String {
    let beacon = Beacon {
        recipient: mail_address(rig_name, Role::Architect),
        sender: "mayor".to_string(),
        topic: "review".to_string(),
    };
    build_startup_prompt(
        &beacon,
        "Run `gt prime` and check mail for review requests.",
    )
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
