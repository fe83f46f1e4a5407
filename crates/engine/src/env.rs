// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// How long to wait for the agent to replace the session shell.
pub fn startup_timeout() -> Option<Duration> {
    parse_duration_ms("GT_STARTUP_TIMEOUT_MS")
}

/// Pause after a successful start so banner output can flush.
pub fn settle_delay() -> Option<Duration> {
    parse_duration_ms("GT_SETTLE_DELAY_MS")
}

/// Total time spent polling for a startup dialog, in 200ms attempts.
pub fn prompt_poll_max_attempts() -> Option<usize> {
    parse_duration_ms("GT_PROMPT_POLL_MS").map(|d| (d.as_millis() / 200).max(1) as usize)
}
