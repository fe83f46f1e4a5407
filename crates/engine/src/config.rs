// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle timing and detection settings

use std::time::Duration;

/// Shells that may host the agent before it takes over the pane.
pub const SUPPORTED_SHELLS: &[&str] = &["bash", "zsh", "sh", "fish", "tcsh", "ksh"];

/// Timing knobs for starting an agent session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Bound on waiting for the agent command to appear in the session
    pub startup_timeout: Duration,
    /// Pause before `start` returns
    pub settle_delay: Duration,
    /// Pane commands that mean "agent not running yet"
    pub supported_shells: Vec<String>,
    pub prompt_poll_attempts: usize,
    pub prompt_poll_interval: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            startup_timeout: Duration::from_secs(60),
            settle_delay: Duration::from_secs(1),
            supported_shells: SUPPORTED_SHELLS.iter().map(|s| s.to_string()).collect(),
            prompt_poll_attempts: 15,
            prompt_poll_interval: Duration::from_millis(200),
        }
    }
}

impl LifecycleConfig {
    /// Defaults, overridden by `GT_STARTUP_TIMEOUT_MS`, `GT_SETTLE_DELAY_MS`
    /// and `GT_PROMPT_POLL_MS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            startup_timeout: crate::env::startup_timeout().unwrap_or(defaults.startup_timeout),
            settle_delay: crate::env::settle_delay().unwrap_or(defaults.settle_delay),
            prompt_poll_attempts: crate::env::prompt_poll_max_attempts()
                .unwrap_or(defaults.prompt_poll_attempts),
            ..defaults
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
