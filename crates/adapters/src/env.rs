// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Poll interval while waiting for a session's command to change (default: 200ms).
pub fn command_poll_ms() -> Duration {
    parse_duration_ms("GT_COMMAND_POLL_MS").unwrap_or(Duration::from_millis(200))
}

/// Grace period between SIGTERM to a pane's processes and killing the session (default: 100ms).
pub fn kill_grace_ms() -> Duration {
    parse_duration_ms("GT_KILL_GRACE_MS").unwrap_or(Duration::from_millis(100))
}

/// Identity registry CLI binary (default: `bd`).
pub fn bd_binary() -> String {
    std::env::var("GT_BD_BIN")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "bd".to_string())
}
